use protospec_core::PrdCompilerError;
use protospec_storage::StorageError;

/// Job-level failure codes written into `CompileJobRecord.error.code` when
/// the compiler did not produce a structured [`PrdCompilerError`].
pub mod codes {
    /// Internal compiler fault or repository failure.
    pub const UNEXPECTED_COMPILER_ERROR: &str = "UNEXPECTED_COMPILER_ERROR";
    /// The compiler panicked.
    pub const UNKNOWN_COMPILER_ERROR: &str = "UNKNOWN_COMPILER_ERROR";
}

/// Errors returned to callers of the job service. Compile failures are not
/// errors here; they end up on the job record.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
    #[error(transparent)]
    UnsupportedSourceType(PrdCompilerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl JobServiceError {
    /// True for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            JobServiceError::BlankField { .. } | JobServiceError::UnsupportedSourceType(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, JobServiceError::Storage(StorageError::NotFound { .. }))
    }
}
