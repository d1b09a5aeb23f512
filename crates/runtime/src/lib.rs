//! protospec-runtime: consuming a compiled ProtoSpec at runtime.
//!
//! - [`replay`] turns an interaction into a timed, cancelable step sequence.
//! - [`render`] downgrades component trees to what a runtime can draw.
//! - [`merge`] carries user-locked subtrees across recompilations.

pub mod merge;
pub mod render;
pub mod replay;

pub use merge::{merge_locked_nodes, MergeOptions};
pub use render::{
    render_runtime_page, RenderOptions, RenderedPage, RuntimeWarning, UNSUPPORTED_COMPONENT_TYPE,
};
pub use replay::{
    build_replay_plan, run_replay_plan, ReplayError, ReplayOptions, ReplayPlan, ReplayStep,
    DEFAULT_STEP_DELAY,
};
