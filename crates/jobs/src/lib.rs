//! protospec-jobs: background compilation of PRDs.
//!
//! [`CompileJobService`] is constructed explicitly with its repositories
//! and shared by clone; there is no global instance.

pub mod error;
pub mod service;

pub use error::{codes, JobServiceError};
pub use service::{
    CompileJobService, CreateJobRequest, JobServiceConfig, MarkdownCompiler, PrdCompiler,
};
