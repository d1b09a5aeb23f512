//! Trace map: requirement (page) → interaction → component node.
//!
//! Only interactions whose `targetNodeId` resolves to a node of their own
//! page produce an entry. The map is rebuilt from scratch for every spec and
//! never updated in place.

use std::collections::BTreeMap;

use protospec_interchange::ProtoSpec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    pub requirement_id: String,
    pub interaction_id: String,
    pub node_id: String,
    /// Structural locator, e.g. `pages[0].root.children[2]`.
    pub node_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMap {
    pub entries: Vec<TraceEntry>,
    pub by_interaction_id: BTreeMap<String, Vec<TraceEntry>>,
    pub by_node_id: BTreeMap<String, Vec<TraceEntry>>,
    pub by_requirement_id: BTreeMap<String, Vec<TraceEntry>>,
}

impl TraceMap {
    pub fn for_interaction(&self, interaction_id: &str) -> &[TraceEntry] {
        self.by_interaction_id
            .get(interaction_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn for_node(&self, node_id: &str) -> &[TraceEntry] {
        self.by_node_id.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn for_requirement(&self, requirement_id: &str) -> &[TraceEntry] {
        self.by_requirement_id
            .get(requirement_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn build_trace_map(spec: &ProtoSpec) -> TraceMap {
    let mut map = TraceMap::default();

    for (page_index, page) in spec.pages.iter().enumerate() {
        let root_path = format!("pages[{}].root", page_index);
        for interaction in &page.interactions {
            let Some(target) = interaction.target_node_id.as_deref() else {
                continue;
            };
            let Some(node_path) = page.root.path_of(target, &root_path) else {
                continue;
            };
            let entry = TraceEntry {
                requirement_id: page.id.clone(),
                interaction_id: interaction.id.clone(),
                node_id: target.to_string(),
                node_path,
            };
            map.by_interaction_id
                .entry(entry.interaction_id.clone())
                .or_default()
                .push(entry.clone());
            map.by_node_id
                .entry(entry.node_id.clone())
                .or_default()
                .push(entry.clone());
            map.by_requirement_id
                .entry(entry.requirement_id.clone())
                .or_default()
                .push(entry.clone());
            map.entries.push(entry);
        }
    }

    map
}
