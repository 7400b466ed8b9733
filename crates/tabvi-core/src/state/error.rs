use thiserror::Error;

/// Error type for schema and object-state construction and access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("duplicate object class '{class}'")]
    DuplicateClass { class: String },

    #[error("duplicate attribute '{attribute}' in class '{class}'")]
    DuplicateAttribute { class: String, attribute: String },

    #[error("unknown object class '{class}'")]
    UnknownClass { class: String },

    #[error("class '{class}' has no attribute '{attribute}'")]
    UnknownAttribute { class: String, attribute: String },

    #[error("class '{class}' has no relation '{relation}'")]
    UnknownRelation { class: String, relation: String },

    #[error("unknown object '{object}'")]
    UnknownObject { object: String },

    #[error("duplicate object name '{name}'")]
    DuplicateObject { name: String },

    #[error("class '{class}' expects {expected} attribute values, got {got}")]
    ArityMismatch {
        class: String,
        expected: usize,
        got: usize,
    },
}
