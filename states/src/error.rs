use std::any::TypeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("State not found: {name} ({id:?}), context: {context}")]
    StateNotFound {
        id: TypeId,
        name: &'static str,
        context: String,
    },
}

impl StateError {
    pub fn state_not_found(id: TypeId, name: &'static str, context: impl Into<String>) -> Self {
        Self::StateNotFound {
            id,
            name,
            context: context.into(),
        }
    }
}
