use std::sync::Arc;

use async_trait::async_trait;
use protospec_interchange::ProtoSpec;

use crate::error::StorageError;
use crate::memory::{InMemoryCompileJobRepository, InMemoryProtoSpecRepository};
use crate::record::CompileJobRecord;

/// Storage for compiled ProtoSpec documents.
///
/// Implementations must be `Send + Sync + 'static` to be shared across
/// async tasks and axum application state.
#[async_trait]
pub trait ProtoSpecRepository: Send + Sync + 'static {
    /// Store a new spec. Returns `Err(StorageError::Duplicate)` if a spec
    /// with the same id exists.
    async fn create(&self, spec: ProtoSpec) -> Result<(), StorageError>;

    /// Returns `Err(StorageError::NotFound)` if there is no such spec.
    async fn get_by_id(&self, id: &str) -> Result<ProtoSpec, StorageError>;

    /// All specs of a project, oldest first.
    async fn list_by_project(&self, project_id: &str) -> Result<Vec<ProtoSpec>, StorageError>;
}

/// Storage for compile job records.
#[async_trait]
pub trait CompileJobRepository: Send + Sync + 'static {
    /// Store a new job. Returns `Err(StorageError::Duplicate)` on id reuse.
    async fn create(&self, record: CompileJobRecord) -> Result<(), StorageError>;

    /// Replace the stored job with `record`.
    ///
    /// Rejects unknown ids (`NotFound`), changes to `projectId`, `payload`
    /// or `createdAt` (`ImmutableField`) and status changes that
    /// [`JobStatus::can_transition_to`](crate::JobStatus::can_transition_to)
    /// forbids (`InvalidTransition`). Returns the stored record.
    async fn update(&self, record: CompileJobRecord) -> Result<CompileJobRecord, StorageError>;

    /// Returns `Err(StorageError::NotFound)` if there is no such job.
    async fn get_by_id(&self, id: &str) -> Result<CompileJobRecord, StorageError>;

    /// All jobs of a project in creation order.
    async fn list_by_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<CompileJobRecord>, StorageError>;
}

/// The repositories a service is constructed with.
#[derive(Clone)]
pub struct Repositories {
    pub specs: Arc<dyn ProtoSpecRepository>,
    pub jobs: Arc<dyn CompileJobRepository>,
}

impl Repositories {
    pub fn new(specs: Arc<dyn ProtoSpecRepository>, jobs: Arc<dyn CompileJobRepository>) -> Self {
        Repositories { specs, jobs }
    }

    /// Fresh, empty in-memory repositories.
    pub fn in_memory() -> Self {
        Repositories {
            specs: Arc::new(InMemoryProtoSpecRepository::new()),
            jobs: Arc::new(InMemoryCompileJobRepository::new()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
