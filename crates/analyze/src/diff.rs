//! Spec diff keyed by stable ids.
//!
//! Interactions compare on name, event, actions and target. Nodes compare on
//! their own type, name and props; a change below a node shows up on the
//! child, not the parent.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use protospec_interchange::{ComponentNode, InteractionSpec, ProtoSpec};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub interactions_added: usize,
    pub interactions_removed: usize,
    pub interactions_modified: usize,
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub nodes_modified: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDiff {
    pub interactions_added: Vec<String>,
    pub interactions_removed: Vec<String>,
    pub interactions_modified: Vec<String>,
    pub nodes_added: Vec<String>,
    pub nodes_removed: Vec<String>,
    pub nodes_modified: Vec<String>,
    pub summary: DiffSummary,
}

impl SpecDiff {
    pub fn has_changes(&self) -> bool {
        !(self.interactions_added.is_empty()
            && self.interactions_removed.is_empty()
            && self.interactions_modified.is_empty()
            && self.nodes_added.is_empty()
            && self.nodes_removed.is_empty()
            && self.nodes_modified.is_empty())
    }

    /// One `+`/`-`/`~` line per changed id, interactions first.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let groups = [
            ('+', "interaction", &self.interactions_added),
            ('-', "interaction", &self.interactions_removed),
            ('~', "interaction", &self.interactions_modified),
            ('+', "node", &self.nodes_added),
            ('-', "node", &self.nodes_removed),
            ('~', "node", &self.nodes_modified),
        ];
        for (sign, kind, ids) in groups {
            for id in ids {
                let _ = writeln!(out, "{} {} {}", sign, kind, id);
            }
        }
        if out.is_empty() {
            out.push_str("no changes\n");
        }
        out
    }
}

fn interaction_index(spec: &ProtoSpec) -> BTreeMap<&str, &InteractionSpec> {
    let mut index = BTreeMap::new();
    for (_, interaction) in spec.interactions() {
        index.entry(interaction.id.as_str()).or_insert(interaction);
    }
    index
}

fn node_index(spec: &ProtoSpec) -> BTreeMap<&str, &ComponentNode> {
    let mut index = BTreeMap::new();
    for page in &spec.pages {
        page.root.visit("", &mut |node, _| {
            index.entry(node.id.as_str()).or_insert(node);
        });
    }
    index
}

fn interaction_changed(a: &InteractionSpec, b: &InteractionSpec) -> bool {
    a.name != b.name
        || a.event != b.event
        || a.actions != b.actions
        || a.target_node_id != b.target_node_id
}

fn node_changed(a: &ComponentNode, b: &ComponentNode) -> bool {
    a.name != b.name || a.body != b.body || a.extra != b.extra
}

/// Added, removed and modified ids, each list sorted by id.
fn diff_maps<T>(
    previous: &BTreeMap<&str, &T>,
    next: &BTreeMap<&str, &T>,
    changed: fn(&T, &T) -> bool,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut modified = Vec::new();
    for (id, after) in next {
        match previous.get(id) {
            None => added.push(id.to_string()),
            Some(before) if changed(before, after) => modified.push(id.to_string()),
            Some(_) => {}
        }
    }
    for id in previous.keys() {
        if !next.contains_key(id) {
            removed.push(id.to_string());
        }
    }
    (added, removed, modified)
}

pub fn compute_spec_diff(previous: &ProtoSpec, next: &ProtoSpec) -> SpecDiff {
    let (interactions_added, interactions_removed, interactions_modified) = diff_maps(
        &interaction_index(previous),
        &interaction_index(next),
        interaction_changed,
    );
    let (nodes_added, nodes_removed, nodes_modified) =
        diff_maps(&node_index(previous), &node_index(next), node_changed);

    let summary = DiffSummary {
        interactions_added: interactions_added.len(),
        interactions_removed: interactions_removed.len(),
        interactions_modified: interactions_modified.len(),
        nodes_added: nodes_added.len(),
        nodes_removed: nodes_removed.len(),
        nodes_modified: nodes_modified.len(),
    };
    SpecDiff {
        interactions_added,
        interactions_removed,
        interactions_modified,
        nodes_added,
        nodes_removed,
        nodes_modified,
        summary,
    }
}
