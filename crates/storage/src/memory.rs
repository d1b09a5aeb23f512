//! In-memory repositories. Records live in insertion-ordered vectors behind
//! a tokio `RwLock`; lookups are linear, which is fine for a stand-in.

use async_trait::async_trait;
use protospec_interchange::ProtoSpec;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::record::CompileJobRecord;
use crate::repository::{CompileJobRepository, ProtoSpecRepository};

#[derive(Debug, Default)]
pub struct InMemoryProtoSpecRepository {
    specs: RwLock<Vec<ProtoSpec>>,
}

impl InMemoryProtoSpecRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProtoSpecRepository for InMemoryProtoSpecRepository {
    async fn create(&self, spec: ProtoSpec) -> Result<(), StorageError> {
        let mut specs = self.specs.write().await;
        if specs.iter().any(|s| s.id == spec.id) {
            return Err(StorageError::Duplicate {
                kind: "spec",
                id: spec.id,
            });
        }
        specs.push(spec);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<ProtoSpec, StorageError> {
        self.specs
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: "spec",
                id: id.to_string(),
            })
    }

    async fn list_by_project(&self, project_id: &str) -> Result<Vec<ProtoSpec>, StorageError> {
        Ok(self
            .specs
            .read()
            .await
            .iter()
            .filter(|s| s.meta.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCompileJobRepository {
    jobs: RwLock<Vec<CompileJobRecord>>,
}

impl InMemoryCompileJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompileJobRepository for InMemoryCompileJobRepository {
    async fn create(&self, record: CompileJobRecord) -> Result<(), StorageError> {
        let mut jobs = self.jobs.write().await;
        if jobs.iter().any(|j| j.id == record.id) {
            return Err(StorageError::Duplicate {
                kind: "job",
                id: record.id,
            });
        }
        jobs.push(record);
        Ok(())
    }

    async fn update(&self, record: CompileJobRecord) -> Result<CompileJobRecord, StorageError> {
        let mut jobs = self.jobs.write().await;
        let stored = jobs
            .iter_mut()
            .find(|j| j.id == record.id)
            .ok_or_else(|| StorageError::NotFound {
                kind: "job",
                id: record.id.clone(),
            })?;

        let immutable = [
            ("projectId", stored.project_id != record.project_id),
            ("payload", stored.payload != record.payload),
            ("createdAt", stored.created_at != record.created_at),
        ];
        if let Some((field, _)) = immutable.iter().find(|(_, changed)| *changed) {
            return Err(StorageError::ImmutableField {
                id: record.id,
                field: *field,
            });
        }
        if !stored.status.can_transition_to(record.status) {
            return Err(StorageError::InvalidTransition {
                id: record.id,
                from: stored.status.to_string(),
                to: record.status.to_string(),
            });
        }

        *stored = record;
        Ok(stored.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<CompileJobRecord, StorageError> {
        self.jobs
            .read()
            .await
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: "job",
                id: id.to_string(),
            })
    }

    async fn list_by_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<CompileJobRecord>, StorageError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| j.project_id == project_id)
            .cloned()
            .collect())
    }
}
