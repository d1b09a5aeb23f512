//! protospec-analyze: checks that run over a compiled ProtoSpec.
//!
//! - [`trace`] indexes requirement → interaction → node links.
//! - [`diff`] compares two specs by stable id.
//! - [`gate`] runs the quality gate and produces a [`QualityGateReport`].
//!
//! Everything here reads a spec and never mutates it, so any of these can
//! run concurrently over the same document.

pub mod diff;
pub mod gate;
pub mod report;
pub mod trace;

pub use diff::{compute_spec_diff, DiffSummary, SpecDiff};
pub use gate::{run_quality_gate, GateOptions};
pub use report::{CheckName, GateCheck, QualityGateReport};
pub use trace::{build_trace_map, TraceEntry, TraceMap};
