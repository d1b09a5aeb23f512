//! protospec-interchange: the ProtoSpec data model shared by every crate.
//!
//! Provides typed structs for pages, component trees, interactions and
//! acceptance criteria, the design-token record with its theme variants,
//! and a single [`from_json()`] entry point that loads a ProtoSpec from a
//! `serde_json::Value` (for example, LLM output handed over as opaque JSON).
//!
//! All wire JSON uses camelCase field names.

pub mod component;
pub mod deserialize;
pub mod tokens;
pub mod types;

pub use component::{ComponentBody, ComponentNode, ComponentType};
pub use deserialize::{from_json, from_json_str, InterchangeError};
pub use tokens::{to_css_variables, DesignTokens, ThemeVariant};
pub use types::*;
