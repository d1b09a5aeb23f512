//! Whitelist rendering: any node a runtime cannot draw becomes a
//! `Container` with the same id, name and (rendered) children.

use std::collections::BTreeSet;

use protospec_interchange::{ComponentBody, ComponentNode, ComponentType, PageSpec};
use serde::Serialize;
use serde_json::Map;

pub const UNSUPPORTED_COMPONENT_TYPE: &str = "UNSUPPORTED_COMPONENT_TYPE";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub allowed_components: BTreeSet<ComponentType>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            allowed_components: ComponentType::ALL.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeWarning {
    pub code: String,
    pub node_id: String,
    pub component_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub page: PageSpec,
    pub warnings: Vec<RuntimeWarning>,
}

impl RenderedPage {
    pub fn root(&self) -> &ComponentNode {
        &self.page.root
    }
}

fn render_node(
    node: &ComponentNode,
    allowed: &BTreeSet<ComponentType>,
    warnings: &mut Vec<RuntimeWarning>,
) -> ComponentNode {
    let supported = node
        .component_type()
        .is_some_and(|t| allowed.contains(&t));
    let (body, extra) = if supported {
        (node.body.clone(), node.extra.clone())
    } else {
        warnings.push(RuntimeWarning {
            code: UNSUPPORTED_COMPONENT_TYPE.to_string(),
            node_id: node.id.clone(),
            component_type: node.type_name().to_string(),
        });
        (ComponentBody::Container, Map::new())
    };
    ComponentNode {
        id: node.id.clone(),
        name: node.name.clone(),
        body,
        extra,
        children: node
            .children
            .iter()
            .map(|c| render_node(c, allowed, warnings))
            .collect(),
    }
}

/// Render `page` against the component whitelist. The input is untouched;
/// interactions and criteria are carried over as-is.
pub fn render_runtime_page(page: &PageSpec, options: &RenderOptions) -> RenderedPage {
    let mut warnings = Vec::new();
    let root = render_node(&page.root, &options.allowed_components, &mut warnings);
    RenderedPage {
        page: PageSpec {
            root,
            ..page.clone()
        },
        warnings,
    }
}
