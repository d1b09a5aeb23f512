/// All errors that can be returned by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No record of `kind` with the given id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A record of `kind` with this id already exists.
    #[error("{kind} already exists: {id}")]
    Duplicate { kind: &'static str, id: String },

    /// A job update tried to move its status backwards or out of a terminal state.
    #[error("invalid status transition for job {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },

    /// A job update tried to change a field that is fixed at creation.
    #[error("field '{field}' of job {id} cannot change")]
    ImmutableField { id: String, field: &'static str },

    /// A backend-specific storage error (connection, serialization, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
