//! protospec-storage: persistence seam for compiled specs and compile jobs.
//!
//! The repositories are async traits so a database backend can replace the
//! in-memory one without touching the job service. Any implementation can
//! be checked with [`conformance::run_conformance_suite`].

pub mod conformance;
mod error;
mod memory;
mod record;
mod repository;

pub use error::StorageError;
pub use memory::{InMemoryCompileJobRepository, InMemoryProtoSpecRepository};
pub use record::{CompileJobPayload, CompileJobRecord, JobError, JobResult, JobStatus};
pub use repository::{CompileJobRepository, ProtoSpecRepository, Repositories};
