//! Typed structs for the ProtoSpec document and its compiler inputs/outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::ComponentNode;
use crate::tokens::DesignTokens;

// ── Compiler input ──────────────────────────────────────────────────

/// Format of the PRD source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Markdown,
}

/// A requirements document handed to the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdSource {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    pub content: String,
}

impl PrdSource {
    pub fn markdown(project_id: impl Into<String>, content: impl Into<String>) -> Self {
        PrdSource {
            project_id: project_id.into(),
            title: None,
            source_type: SourceType::Markdown,
            content: content.into(),
        }
    }
}

// ── Interactions ────────────────────────────────────────────────────

/// The kind of an atomic interaction effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Navigate,
    SetState,
    CallApi,
    OpenModal,
    CloseModal,
    ShowToast,
    SubmitForm,
    Custom(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::SetState => "setState",
            ActionKind::CallApi => "callApi",
            ActionKind::OpenModal => "openModal",
            ActionKind::CloseModal => "closeModal",
            ActionKind::ShowToast => "showToast",
            ActionKind::SubmitForm => "submitForm",
            ActionKind::Custom(name) => name,
        }
    }
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "navigate" => ActionKind::Navigate,
            "setState" => ActionKind::SetState,
            "callApi" => ActionKind::CallApi,
            "openModal" => ActionKind::OpenModal,
            "closeModal" => ActionKind::CloseModal,
            "showToast" => ActionKind::ShowToast,
            "submitForm" => ActionKind::SubmitForm,
            _ => ActionKind::Custom(name),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic effect of an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub payload: Value,
}

/// A named, triggerable UI behavior composed of ordered actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,
}

// ── Pages ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// One compiled page: component tree, interactions and acceptance criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub root: ComponentNode,
    #[serde(default)]
    pub interactions: Vec<InteractionSpec>,
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
}

impl PageSpec {
    pub fn interaction(&self, id: &str) -> Option<&InteractionSpec> {
        self.interactions.iter().find(|i| i.id == id)
    }
}

// ── ProtoSpec ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecMeta {
    #[serde(default)]
    pub project_id: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub generated_at: String,
    /// Lowercase hex SHA-256 of the PRD content.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub compiler_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The compiled, typed UI specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoSpec {
    #[serde(default)]
    pub id: String,
    pub meta: SpecMeta,
    #[serde(default)]
    pub tokens: DesignTokens,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

impl ProtoSpec {
    pub fn page(&self, id: &str) -> Option<&PageSpec> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Iterate `(page, interaction)` pairs in document order.
    pub fn interactions(&self) -> impl Iterator<Item = (&PageSpec, &InteractionSpec)> {
        self.pages
            .iter()
            .flat_map(|p| p.interactions.iter().map(move |i| (p, i)))
    }
}

// ── Compiler diagnostics ────────────────────────────────────────────

/// A non-fatal compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerWarning {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

/// How much a human should trust the compiled output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub confidence: f64,
    pub needs_human_review: bool,
    pub reasons: Vec<String>,
}
