use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable error and warning codes emitted by the compiler.
pub mod codes {
    // Errors
    pub const EMPTY_SOURCE: &str = "EMPTY_SOURCE";
    pub const MISSING_TITLE: &str = "MISSING_TITLE";
    pub const MALFORMED_HEADING: &str = "MALFORMED_HEADING";
    pub const UNTERMINATED_CODE_FENCE: &str = "UNTERMINATED_CODE_FENCE";
    pub const UNSUPPORTED_SOURCE_TYPE: &str = "UNSUPPORTED_SOURCE_TYPE";

    // Warnings
    pub const CONTENT_BEFORE_TITLE: &str = "CONTENT_BEFORE_TITLE";
    pub const DUPLICATE_PAGE_TITLE: &str = "DUPLICATE_PAGE_TITLE";
    pub const EMPTY_SECTION: &str = "EMPTY_SECTION";
    pub const UNRECOGNIZED_SECTION: &str = "UNRECOGNIZED_SECTION";
    pub const INTERACTION_UNPARSED: &str = "INTERACTION_UNPARSED";
    pub const INTERACTION_WITHOUT_ACTIONS: &str = "INTERACTION_WITHOUT_ACTIONS";
    pub const INTERACTION_TARGET_FALLBACK: &str = "INTERACTION_TARGET_FALLBACK";
    pub const ACTION_PAYLOAD_UNPARSED: &str = "ACTION_PAYLOAD_UNPARSED";
}

/// A structural compile error. Carries a stable `code`, a human message
/// and optional field-level details (line numbers, offending markers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct PrdCompilerError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
}

impl PrdCompilerError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        PrdCompilerError {
            code: code.to_string(),
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn at_line(self, line: u32) -> Self {
        self.with_detail("line", line)
    }
}

/// Everything `compile_prd_to_proto_spec` can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The PRD is structurally unusable.
    #[error(transparent)]
    Prd(#[from] PrdCompilerError),
    /// The compiler itself misbehaved (e.g. produced a spec that fails validation).
    #[error("internal compiler fault: {0}")]
    Internal(String),
}
