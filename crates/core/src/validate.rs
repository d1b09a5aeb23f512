//! Structural validation of ProtoSpec documents.
//!
//! The validator is pure and collects every issue instead of stopping at
//! the first one. Out-of-whitelist component types are valid here; the
//! runtime renderer downgrades them.

use std::collections::{HashMap, HashSet};

use protospec_interchange::{ComponentNode, PageSpec, ProtoSpec};
use serde::{Deserialize, Serialize};

/// Stable validation issue codes.
pub mod issue_codes {
    pub const MISSING_SPEC_ID: &str = "MISSING_SPEC_ID";
    pub const MISSING_PROJECT_ID: &str = "MISSING_PROJECT_ID";
    pub const MISSING_PAGE_ID: &str = "MISSING_PAGE_ID";
    pub const MISSING_PAGE_SLUG: &str = "MISSING_PAGE_SLUG";
    pub const MISSING_PAGE_TITLE: &str = "MISSING_PAGE_TITLE";
    pub const DUPLICATE_PAGE_ID: &str = "DUPLICATE_PAGE_ID";
    pub const MISSING_NODE_ID: &str = "MISSING_NODE_ID";
    pub const MISSING_NODE_NAME: &str = "MISSING_NODE_NAME";
    pub const DUPLICATE_NODE_ID: &str = "DUPLICATE_NODE_ID";
    pub const DUPLICATE_NODE_REFERENCE: &str = "DUPLICATE_NODE_REFERENCE";
    pub const MISSING_INTERACTION_ID: &str = "MISSING_INTERACTION_ID";
    pub const MISSING_INTERACTION_NAME: &str = "MISSING_INTERACTION_NAME";
    pub const MISSING_INTERACTION_EVENT: &str = "MISSING_INTERACTION_EVENT";
    pub const DUPLICATE_INTERACTION_ID: &str = "DUPLICATE_INTERACTION_ID";
    pub const MISSING_ACTION_TYPE: &str = "MISSING_ACTION_TYPE";
    pub const DANGLING_TARGET_NODE: &str = "DANGLING_TARGET_NODE";
    pub const MISSING_CRITERION_ID: &str = "MISSING_CRITERION_ID";
    pub const MISSING_CRITERION_DESCRIPTION: &str = "MISSING_CRITERION_DESCRIPTION";
    pub const DUPLICATE_CRITERION_ID: &str = "DUPLICATE_CRITERION_ID";
}

use issue_codes as ic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    /// Location in the document, e.g. `pages[0].root.children[2]`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Issues with the given code, in document order.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

struct Collector {
    issues: Vec<ValidationIssue>,
}

impl Collector {
    fn push(&mut self, code: &str, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            code: code.to_string(),
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate_proto_spec(spec: &ProtoSpec) -> ValidationReport {
    let mut c = Collector { issues: Vec::new() };

    if spec.id.trim().is_empty() {
        c.push(ic::MISSING_SPEC_ID, "id", "spec id is empty");
    }
    if spec.meta.project_id.trim().is_empty() {
        c.push(ic::MISSING_PROJECT_ID, "meta.projectId", "meta.projectId is empty");
    }

    let mut page_ids: HashSet<&str> = HashSet::new();
    for (i, page) in spec.pages.iter().enumerate() {
        let path = format!("pages[{}]", i);
        if page.id.trim().is_empty() {
            c.push(ic::MISSING_PAGE_ID, format!("{}.id", path), "page id is empty");
        } else if !page_ids.insert(page.id.as_str()) {
            c.push(
                ic::DUPLICATE_PAGE_ID,
                format!("{}.id", path),
                format!("duplicate page id '{}'", page.id),
            );
        }
        if page.slug.trim().is_empty() {
            c.push(ic::MISSING_PAGE_SLUG, format!("{}.slug", path), "page slug is empty");
        }
        if page.title.trim().is_empty() {
            c.push(ic::MISSING_PAGE_TITLE, format!("{}.title", path), "page title is empty");
        }
        validate_page(page, &path, &mut c);
    }

    ValidationReport {
        valid: c.issues.is_empty(),
        issues: c.issues,
    }
}

fn validate_page(page: &PageSpec, path: &str, c: &mut Collector) {
    // id → first occurrence, so a repeat can be told apart from a copy.
    let mut seen: HashMap<&str, &ComponentNode> = HashMap::new();
    let mut node_issues: Vec<(String, String, String)> = Vec::new();
    let root_path = format!("{}.root", path);
    page.root.visit(&root_path, &mut |node, node_path| {
        if node.id.trim().is_empty() {
            node_issues.push((
                ic::MISSING_NODE_ID.to_string(),
                node_path.to_string(),
                "node id is empty".to_string(),
            ));
        } else if let Some(first) = seen.get(node.id.as_str()) {
            let (code, what) = if *first == node {
                (ic::DUPLICATE_NODE_REFERENCE, "node appears more than once")
            } else {
                (ic::DUPLICATE_NODE_ID, "duplicate node id")
            };
            node_issues.push((
                code.to_string(),
                node_path.to_string(),
                format!("{} '{}'", what, node.id),
            ));
        } else {
            seen.insert(node.id.as_str(), node);
        }
        if node.name.trim().is_empty() {
            node_issues.push((
                ic::MISSING_NODE_NAME.to_string(),
                node_path.to_string(),
                format!("node '{}' has no name", node.id),
            ));
        }
    });
    for (code, p, m) in node_issues {
        c.push(&code, p, m);
    }

    let mut ix_ids: HashSet<&str> = HashSet::new();
    for (j, ix) in page.interactions.iter().enumerate() {
        let ix_path = format!("{}.interactions[{}]", path, j);
        if ix.id.trim().is_empty() {
            c.push(ic::MISSING_INTERACTION_ID, format!("{}.id", ix_path), "interaction id is empty");
        } else if !ix_ids.insert(ix.id.as_str()) {
            c.push(
                ic::DUPLICATE_INTERACTION_ID,
                format!("{}.id", ix_path),
                format!("duplicate interaction id '{}'", ix.id),
            );
        }
        if ix.name.trim().is_empty() {
            c.push(
                ic::MISSING_INTERACTION_NAME,
                format!("{}.name", ix_path),
                format!("interaction '{}' has no name", ix.id),
            );
        }
        if ix.event.trim().is_empty() {
            c.push(
                ic::MISSING_INTERACTION_EVENT,
                format!("{}.event", ix_path),
                format!("interaction '{}' has no event", ix.id),
            );
        }
        for (k, action) in ix.actions.iter().enumerate() {
            if action.kind.as_str().trim().is_empty() {
                c.push(
                    ic::MISSING_ACTION_TYPE,
                    format!("{}.actions[{}].type", ix_path, k),
                    "action type is empty",
                );
            }
        }
        if let Some(target) = &ix.target_node_id {
            if !seen.contains_key(target.as_str()) {
                c.push(
                    ic::DANGLING_TARGET_NODE,
                    format!("{}.targetNodeId", ix_path),
                    format!("targetNodeId '{}' is not a node of page '{}'", target, page.id),
                );
            }
        }
    }

    let mut ac_ids: HashSet<&str> = HashSet::new();
    for (j, ac) in page.acceptance_criteria.iter().enumerate() {
        let ac_path = format!("{}.acceptanceCriteria[{}]", path, j);
        if ac.id.trim().is_empty() {
            c.push(ic::MISSING_CRITERION_ID, format!("{}.id", ac_path), "criterion id is empty");
        } else if !ac_ids.insert(ac.id.as_str()) {
            c.push(
                ic::DUPLICATE_CRITERION_ID,
                format!("{}.id", ac_path),
                format!("duplicate criterion id '{}'", ac.id),
            );
        }
        if ac.description.trim().is_empty() {
            c.push(
                ic::MISSING_CRITERION_DESCRIPTION,
                format!("{}.description", ac_path),
                format!("criterion '{}' has no description", ac.id),
            );
        }
    }
}
