use std::collections::BTreeMap;

use protospec_interchange::{CompilerWarning, ReviewSummary, SourceType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle of a compile job. Jobs only move forward:
/// `queued -> running -> succeeded | failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    /// Whether a stored record in `self` may be updated to `next`.
    /// Staying in a non-terminal status is allowed; a queued job may fail
    /// without ever running.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Queued, Queued)
                | (Queued, Running)
                | (Queued, Failed)
                | (Running, Running)
                | (Running, Succeeded)
                | (Running, Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the job was asked to compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileJobPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    pub prd_content: String,
}

/// Outcome of a succeeded job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub spec_id: String,
    #[serde(default)]
    pub warnings: Vec<CompilerWarning>,
    pub review: ReviewSummary,
}

/// Structured failure of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

/// A persisted compile job. `id`, `project_id`, `payload` and `created_at`
/// are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileJobRecord {
    pub id: String,
    pub project_id: String,
    pub status: JobStatus,
    pub payload: CompileJobPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    /// RFC 3339 timestamp string.
    pub updated_at: String,
}

impl CompileJobRecord {
    /// A fresh `queued` record.
    pub fn queued(
        id: impl Into<String>,
        project_id: impl Into<String>,
        payload: CompileJobPayload,
        now: impl Into<String>,
    ) -> Self {
        let now = now.into();
        CompileJobRecord {
            id: id.into(),
            project_id: project_id.into(),
            status: JobStatus::Queued,
            payload,
            result: None,
            error: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
