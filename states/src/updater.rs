use std::any::{Any, TypeId, type_name};
use std::fmt::{Debug, Formatter};

use flume::Sender;
use log::debug;

use crate::State;

type ApplyFn = Box<dyn FnOnce(&mut dyn Any) + Send>;

/// A queued change for one registered state.
pub(crate) struct Update {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) apply: ApplyFn,
}

/// `Send` handle used by async work to post state changes back to the owning
/// [`StateCtx`](crate::StateCtx).
///
/// Nothing is applied until the owner calls [`StateCtx::sync`](crate::StateCtx::sync).
/// Once the owning context is dropped, posted updates are silently discarded.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Debug for Updater {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("queued", &self.send.len())
            .finish()
    }
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Replaces the stored `T` with `value`.
    pub fn set<T: State + Send>(&self, value: T) {
        self.apply::<T>(move |slot| *slot = value);
    }

    /// Runs `f` against the stored `T` on the owning thread.
    pub fn apply<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let update = Update {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            apply: Box::new(move |any| {
                if let Some(state) = any.downcast_mut::<T>() {
                    f(state);
                }
            }),
        };

        if self.send.send(update).is_err() {
            debug!("Updater: owner of {} is gone, update dropped", type_name::<T>());
        }
    }
}
