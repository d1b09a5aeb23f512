//! Locked-node merging across recompilations.
//!
//! A locked node keeps its previous subtree verbatim. Ids inside a locked
//! subtree are reserved for it: wherever the regenerated tree reuses one of
//! them outside the locked subtree, that node is removed and its children
//! take its place, so ids stay unique per page.

use std::collections::{BTreeSet, HashMap, HashSet};

use protospec_interchange::{ComponentNode, PageSpec};

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub locked_node_ids: BTreeSet<String>,
}

/// A locked subtree taken from the previous tree.
struct Locked {
    subtree: ComponentNode,
    /// Parent id in the previous tree; `None` for the root.
    parent: Option<String>,
}

/// Outermost locked nodes of `root` in pre-order. A locked node inside
/// another locked subtree is already carried by its ancestor.
fn collect_locked(
    node: &ComponentNode,
    parent: Option<&str>,
    locked_ids: &BTreeSet<String>,
    out: &mut Vec<(String, Locked)>,
) {
    if locked_ids.contains(&node.id) {
        out.push((
            node.id.clone(),
            Locked {
                subtree: node.clone(),
                parent: parent.map(str::to_string),
            },
        ));
        return;
    }
    for child in &node.children {
        collect_locked(child, Some(&node.id), locked_ids, out);
    }
}

fn rebuild(
    node: ComponentNode,
    locked: &HashMap<String, ComponentNode>,
    reserved: &HashSet<String>,
    placed: &mut HashSet<String>,
) -> Vec<ComponentNode> {
    if let Some(subtree) = locked.get(&node.id) {
        if placed.insert(node.id.clone()) {
            return vec![subtree.clone()];
        }
    } else if !reserved.contains(&node.id) {
        let ComponentNode {
            id,
            name,
            body,
            extra,
            children,
        } = node;
        let children = children
            .into_iter()
            .flat_map(|c| rebuild(c, locked, reserved, placed))
            .collect();
        return vec![ComponentNode {
            id,
            name,
            body,
            extra,
            children,
        }];
    }
    // A reserved id (or a second copy of a locked id): splice the children.
    node.children
        .into_iter()
        .flat_map(|c| rebuild(c, locked, reserved, placed))
        .collect()
}

fn find_mut<'a>(node: &'a mut ComponentNode, id: &str) -> Option<&'a mut ComponentNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter_mut().find_map(|c| find_mut(c, id))
}

/// Merge `regenerated` with the locked subtrees of `previous`.
///
/// Everything outside locked subtrees comes from `regenerated`. Locked ids
/// that no longer exist in `previous` are ignored. A locked node that
/// `regenerated` dropped is re-appended to its previous parent, or to the
/// root when that parent is gone too.
pub fn merge_locked_nodes(
    previous: &PageSpec,
    regenerated: &PageSpec,
    options: &MergeOptions,
) -> PageSpec {
    let mut ordered = Vec::new();
    collect_locked(&previous.root, None, &options.locked_node_ids, &mut ordered);
    if ordered.is_empty() {
        return regenerated.clone();
    }

    let subtrees: HashMap<String, ComponentNode> = ordered
        .iter()
        .map(|(id, l)| (id.clone(), l.subtree.clone()))
        .collect();
    let mut reserved: HashSet<String> = HashSet::new();
    for (_, l) in &ordered {
        l.subtree.visit("", &mut |n, _| {
            reserved.insert(n.id.clone());
        });
    }

    let mut placed = HashSet::new();
    let mut root = match subtrees.get(&regenerated.root.id) {
        Some(subtree) => {
            placed.insert(regenerated.root.id.clone());
            subtree.clone()
        }
        None => {
            let mut root = regenerated.root.clone();
            let children = std::mem::take(&mut root.children);
            root.children = children
                .into_iter()
                .flat_map(|c| rebuild(c, &subtrees, &reserved, &mut placed))
                .collect();
            root
        }
    };

    for (id, l) in ordered {
        if placed.contains(&id) {
            continue;
        }
        let parent = l.parent.as_deref().and_then(|p| find_mut(&mut root, p));
        match parent {
            Some(parent) => parent.children.push(l.subtree),
            None => root.children.push(l.subtree),
        }
        placed.insert(id);
    }

    PageSpec {
        root,
        ..regenerated.clone()
    }
}
