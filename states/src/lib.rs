//! Minimal reactive state container used by the login form.
//!
//! A [`StateCtx`] owns typed states. Synchronous event handlers mutate them
//! through [`StateCtx::update`]; async work posts results through an
//! [`Updater`] which the owning thread applies with [`StateCtx::sync`].
//! Every applied change is reported to subscribed listeners, which is how a
//! view knows to re-render.

mod ctx;
mod error;
mod state;
mod task;
mod updater;

pub use ctx::{StateCtx, SubscriptionId};
pub use error::StateError;
pub use state::State;
pub use task::{run_isolated, spawn_task};
pub use updater::Updater;
