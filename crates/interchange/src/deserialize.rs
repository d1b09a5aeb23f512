//! Loading ProtoSpec documents from JSON.
//!
//! The main entry point is [`from_json`], which takes a
//! `&serde_json::Value` (for example LLM output or a persisted document)
//! and produces a [`ProtoSpec`]. Structural defects such as duplicate ids
//! are not rejected here; that is the validator's job.

use crate::types::ProtoSpec;
use std::fmt;

/// Errors while loading a ProtoSpec document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    MissingField { field: String },
    /// The document could not be parsed or has the wrong shape.
    InvalidDocument(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            InterchangeError::InvalidDocument(msg) => {
                write!(f, "invalid document: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a ProtoSpec from a JSON value.
pub fn from_json(doc: &serde_json::Value) -> Result<ProtoSpec, InterchangeError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| InterchangeError::InvalidDocument("expected a JSON object".to_string()))?;

    for field in ["meta", "pages"] {
        if !obj.contains_key(field) {
            return Err(InterchangeError::MissingField {
                field: field.to_string(),
            });
        }
    }
    if !obj.get("pages").is_some_and(|p| p.is_array()) {
        return Err(InterchangeError::InvalidDocument(
            "'pages' must be an array".to_string(),
        ));
    }

    serde_json::from_value(doc.clone()).map_err(|e| InterchangeError::InvalidDocument(e.to_string()))
}

/// Parse JSON text and deserialize it as a ProtoSpec.
pub fn from_json_str(src: &str) -> Result<ProtoSpec, InterchangeError> {
    let doc: serde_json::Value =
        serde_json::from_str(src).map_err(|e| InterchangeError::InvalidDocument(e.to_string()))?;
    from_json(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentBody;
    use crate::types::ActionKind;
    use serde_json::json;

    fn make_doc(pages: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "spec-1",
            "meta": {"projectId": "p1", "generatedAt": "2026-01-01T00:00:00Z"},
            "pages": pages,
        })
    }

    #[test]
    fn test_empty_document() {
        let spec = from_json(&make_doc(json!([]))).unwrap();
        assert_eq!(spec.id, "spec-1");
        assert_eq!(spec.meta.project_id, "p1");
        assert!(spec.pages.is_empty());
        assert_eq!(spec.tokens, crate::DesignTokens::light());
    }

    #[test]
    fn test_missing_pages() {
        let doc = json!({"id": "x", "meta": {"projectId": "p"}});
        match from_json(&doc).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "pages"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_pages_not_array() {
        let doc = json!({"id": "x", "meta": {}, "pages": {}});
        assert!(matches!(
            from_json(&doc),
            Err(InterchangeError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_parse_page_with_interaction() {
        let doc = make_doc(json!([{
            "id": "page-orders",
            "slug": "orders",
            "title": "Orders",
            "summary": "",
            "root": {"id": "page-orders", "type": "Page", "name": "Orders", "props": {}, "children": [
                {"id": "page-orders/list", "type": "List", "name": "list", "props": {}, "children": []}
            ]},
            "interactions": [{
                "id": "page-orders:ix:open",
                "name": "open",
                "event": "click",
                "actions": [{"type": "navigate", "payload": {"to": "/orders/1"}}],
                "targetNodeId": "page-orders/list"
            }],
            "acceptanceCriteria": [{"id": "page-orders:ac:1", "description": "see list", "completed": false}]
        }]));
        let spec = from_json(&doc).unwrap();
        let page = &spec.pages[0];
        assert_eq!(page.root.children[0].body, ComponentBody::List);
        let ix = page.interaction("page-orders:ix:open").unwrap();
        assert_eq!(ix.actions[0].kind, ActionKind::Navigate);
        assert_eq!(ix.target_node_id.as_deref(), Some("page-orders/list"));
        assert_eq!(page.acceptance_criteria.len(), 1);
    }

    #[test]
    fn test_invalid_text() {
        assert!(from_json_str("{not json").is_err());
    }
}
