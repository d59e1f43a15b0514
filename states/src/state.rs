use std::any::{Any, type_name};
use std::fmt::Debug;

/// A value that can be stored in a [`StateCtx`](crate::StateCtx).
pub trait State: Any + Debug {
    /// Name used when reporting changes to listeners and in logs.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}
