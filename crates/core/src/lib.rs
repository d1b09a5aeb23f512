#![allow(clippy::result_large_err)]
//! protospec-core: PRD-to-ProtoSpec compiler core library.
//!
//! Provides the four-pass compilation pipeline from a markdown PRD to a
//! ProtoSpec document, plus the structural validator.
//!
//! # Public API
//!
//! - [`compile_prd_to_proto_spec()`] -- run the full pipeline
//! - [`validate_proto_spec()`] -- structural validation of any ProtoSpec
//! - [`PrdCompilerError`] / [`CompileError`] -- compiler error types
//! - [`slugify()`] -- the slug function all deterministic ids are built from
//!
//! Individual pass entry functions are also re-exported for selective
//! pipeline execution.

/// Version stamped into `meta.compilerVersion`.
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compile;
pub mod error;
pub mod ids;
pub mod pass1_outline;
pub mod pass2_sections;
pub mod pass3_build;
pub mod pass4_review;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use compile::{CompileOutput, CompilerOptions};
pub use error::{codes, CompileError, PrdCompilerError};
pub use ids::slugify;
pub use validate::{ValidationIssue, ValidationReport};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use compile::{compile_prd_to_proto_spec, parse_source_type, source_hash};
pub use pass1_outline::lex;
pub use pass2_sections::group_sections;
pub use pass3_build::build_pages;
pub use pass4_review::review;
pub use validate::validate_proto_spec;
