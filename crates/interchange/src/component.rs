//! Component tree types.
//!
//! A [`ComponentNode`] carries its props as a [`ComponentBody`] variant per
//! component type. Props a whitelisted type does not model are kept in
//! [`ComponentNode::extra`] and written back unchanged; out-of-whitelist
//! custom types keep their whole props map. On the wire a node is always
//! `{ "id", "type", "name", "props", "children" }`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The fixed whitelist of component types a runtime knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    Page,
    Container,
    Section,
    Heading,
    Text,
    Button,
    Input,
    Select,
    Textarea,
    Checkbox,
    RadioGroup,
    List,
    ListItem,
    Card,
    Image,
    Modal,
}

impl ComponentType {
    pub const ALL: [ComponentType; 16] = [
        ComponentType::Page,
        ComponentType::Container,
        ComponentType::Section,
        ComponentType::Heading,
        ComponentType::Text,
        ComponentType::Button,
        ComponentType::Input,
        ComponentType::Select,
        ComponentType::Textarea,
        ComponentType::Checkbox,
        ComponentType::RadioGroup,
        ComponentType::List,
        ComponentType::ListItem,
        ComponentType::Card,
        ComponentType::Image,
        ComponentType::Modal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Page => "Page",
            ComponentType::Container => "Container",
            ComponentType::Section => "Section",
            ComponentType::Heading => "Heading",
            ComponentType::Text => "Text",
            ComponentType::Button => "Button",
            ComponentType::Input => "Input",
            ComponentType::Select => "Select",
            ComponentType::Textarea => "Textarea",
            ComponentType::Checkbox => "Checkbox",
            ComponentType::RadioGroup => "RadioGroup",
            ComponentType::List => "List",
            ComponentType::ListItem => "ListItem",
            ComponentType::Card => "Card",
            ComponentType::Image => "Image",
            ComponentType::Modal => "Modal",
        }
    }

    /// Prop keys the typed body models for this type.
    pub fn prop_keys(self) -> &'static [&'static str] {
        match self {
            ComponentType::Page | ComponentType::Container | ComponentType::List => &[],
            ComponentType::Section | ComponentType::Card | ComponentType::Modal => &["title"],
            ComponentType::Heading => &["text", "level"],
            ComponentType::Text | ComponentType::ListItem => &["text"],
            ComponentType::Button => &["label"],
            ComponentType::Input | ComponentType::Textarea => &["label", "placeholder"],
            ComponentType::Select | ComponentType::RadioGroup => &["label", "options"],
            ComponentType::Checkbox => &["label", "checked"],
            ComponentType::Image => &["src", "alt"],
        }
    }

    /// Look up a whitelisted type by its exact wire name.
    pub fn parse(name: &str) -> Option<ComponentType> {
        ComponentType::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component type plus the props that type understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentBody {
    Page,
    Container,
    Section {
        title: Option<String>,
    },
    Heading {
        text: String,
        level: u8,
    },
    Text {
        text: String,
    },
    Button {
        label: String,
    },
    Input {
        label: String,
        placeholder: Option<String>,
    },
    Select {
        label: String,
        options: Vec<String>,
    },
    Textarea {
        label: String,
        placeholder: Option<String>,
    },
    Checkbox {
        label: String,
        checked: bool,
    },
    RadioGroup {
        label: String,
        options: Vec<String>,
    },
    List,
    ListItem {
        text: String,
    },
    Card {
        title: Option<String>,
    },
    Image {
        src: String,
        alt: Option<String>,
    },
    Modal {
        title: Option<String>,
    },
    /// A type outside the whitelist, as emitted by looser generators.
    Custom {
        type_name: String,
        props: Map<String, Value>,
    },
}

impl ComponentBody {
    /// The whitelisted type, or `None` for custom types.
    pub fn component_type(&self) -> Option<ComponentType> {
        let t = match self {
            ComponentBody::Page => ComponentType::Page,
            ComponentBody::Container => ComponentType::Container,
            ComponentBody::Section { .. } => ComponentType::Section,
            ComponentBody::Heading { .. } => ComponentType::Heading,
            ComponentBody::Text { .. } => ComponentType::Text,
            ComponentBody::Button { .. } => ComponentType::Button,
            ComponentBody::Input { .. } => ComponentType::Input,
            ComponentBody::Select { .. } => ComponentType::Select,
            ComponentBody::Textarea { .. } => ComponentType::Textarea,
            ComponentBody::Checkbox { .. } => ComponentType::Checkbox,
            ComponentBody::RadioGroup { .. } => ComponentType::RadioGroup,
            ComponentBody::List => ComponentType::List,
            ComponentBody::ListItem { .. } => ComponentType::ListItem,
            ComponentBody::Card { .. } => ComponentType::Card,
            ComponentBody::Image { .. } => ComponentType::Image,
            ComponentBody::Modal { .. } => ComponentType::Modal,
            ComponentBody::Custom { .. } => return None,
        };
        Some(t)
    }

    /// The wire `type` string.
    pub fn type_name(&self) -> &str {
        match self {
            ComponentBody::Custom { type_name, .. } => type_name,
            other => other
                .component_type()
                .map(ComponentType::as_str)
                .unwrap_or_default(),
        }
    }

    /// The human-readable text a node displays, if any.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            ComponentBody::Heading { text, .. }
            | ComponentBody::Text { text }
            | ComponentBody::ListItem { text } => Some(text),
            ComponentBody::Button { label }
            | ComponentBody::Input { label, .. }
            | ComponentBody::Select { label, .. }
            | ComponentBody::Textarea { label, .. }
            | ComponentBody::Checkbox { label, .. }
            | ComponentBody::RadioGroup { label, .. } => Some(label),
            ComponentBody::Section { title }
            | ComponentBody::Card { title }
            | ComponentBody::Modal { title } => title.as_deref(),
            ComponentBody::Image { alt, .. } => alt.as_deref(),
            ComponentBody::Page | ComponentBody::Container | ComponentBody::List => None,
            ComponentBody::Custom { props, .. } => props.get("text").and_then(Value::as_str),
        }
    }

    /// Build a body from a wire type name and props map.
    ///
    /// Missing or mistyped props fall back to empty values; unknown type
    /// names become [`ComponentBody::Custom`].
    pub fn from_parts(type_name: &str, props: Map<String, Value>) -> ComponentBody {
        let Some(kind) = ComponentType::parse(type_name) else {
            return ComponentBody::Custom {
                type_name: type_name.to_string(),
                props,
            };
        };
        let text = |key: &str| str_prop(&props, key).unwrap_or_default();
        match kind {
            ComponentType::Page => ComponentBody::Page,
            ComponentType::Container => ComponentBody::Container,
            ComponentType::Section => ComponentBody::Section {
                title: str_prop(&props, "title"),
            },
            ComponentType::Heading => ComponentBody::Heading {
                text: text("text"),
                level: props
                    .get("level")
                    .and_then(Value::as_u64)
                    .map(|l| l.clamp(1, 6) as u8)
                    .unwrap_or(1),
            },
            ComponentType::Text => ComponentBody::Text { text: text("text") },
            ComponentType::Button => ComponentBody::Button {
                label: text("label"),
            },
            ComponentType::Input => ComponentBody::Input {
                label: text("label"),
                placeholder: str_prop(&props, "placeholder"),
            },
            ComponentType::Select => ComponentBody::Select {
                label: text("label"),
                options: strings_prop(&props, "options"),
            },
            ComponentType::Textarea => ComponentBody::Textarea {
                label: text("label"),
                placeholder: str_prop(&props, "placeholder"),
            },
            ComponentType::Checkbox => ComponentBody::Checkbox {
                label: text("label"),
                checked: props
                    .get("checked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            ComponentType::RadioGroup => ComponentBody::RadioGroup {
                label: text("label"),
                options: strings_prop(&props, "options"),
            },
            ComponentType::List => ComponentBody::List,
            ComponentType::ListItem => ComponentBody::ListItem { text: text("text") },
            ComponentType::Card => ComponentBody::Card {
                title: str_prop(&props, "title"),
            },
            ComponentType::Image => ComponentBody::Image {
                src: text("src"),
                alt: str_prop(&props, "alt"),
            },
            ComponentType::Modal => ComponentBody::Modal {
                title: str_prop(&props, "title"),
            },
        }
    }

    /// Flatten the body back into a wire props map.
    pub fn to_props(&self) -> Map<String, Value> {
        let mut props = Map::new();
        let mut put = |key: &str, value: Value| {
            props.insert(key.to_string(), value);
        };
        match self {
            ComponentBody::Page | ComponentBody::Container | ComponentBody::List => {}
            ComponentBody::Section { title }
            | ComponentBody::Card { title }
            | ComponentBody::Modal { title } => {
                if let Some(t) = title {
                    put("title", Value::from(t.as_str()));
                }
            }
            ComponentBody::Heading { text, level } => {
                put("text", Value::from(text.as_str()));
                put("level", Value::from(*level));
            }
            ComponentBody::Text { text } | ComponentBody::ListItem { text } => {
                put("text", Value::from(text.as_str()));
            }
            ComponentBody::Button { label } => put("label", Value::from(label.as_str())),
            ComponentBody::Input { label, placeholder }
            | ComponentBody::Textarea { label, placeholder } => {
                put("label", Value::from(label.as_str()));
                if let Some(p) = placeholder {
                    put("placeholder", Value::from(p.as_str()));
                }
            }
            ComponentBody::Select { label, options }
            | ComponentBody::RadioGroup { label, options } => {
                put("label", Value::from(label.as_str()));
                put("options", Value::from(options.clone()));
            }
            ComponentBody::Checkbox { label, checked } => {
                put("label", Value::from(label.as_str()));
                put("checked", Value::from(*checked));
            }
            ComponentBody::Image { src, alt } => {
                put("src", Value::from(src.as_str()));
                if let Some(a) = alt {
                    put("alt", Value::from(a.as_str()));
                }
            }
            ComponentBody::Custom { props: custom, .. } => return custom.clone(),
        }
        props
    }
}

fn str_prop(props: &Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn strings_prop(props: &Map<String, Value>, key: &str) -> Vec<String> {
    props
        .get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// One node in a page's component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawComponentNode", into = "RawComponentNode")]
pub struct ComponentNode {
    pub id: String,
    pub name: String,
    pub body: ComponentBody,
    /// Props outside what `body` models for its type. Always empty for
    /// custom types.
    pub extra: Map<String, Value>,
    pub children: Vec<ComponentNode>,
}

#[derive(Serialize, Deserialize)]
struct RawComponentNode {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default)]
    component_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    props: Map<String, Value>,
    #[serde(default)]
    children: Vec<ComponentNode>,
}

impl From<RawComponentNode> for ComponentNode {
    fn from(raw: RawComponentNode) -> Self {
        let (props, extra) = match ComponentType::parse(&raw.component_type) {
            Some(kind) => {
                let keys = kind.prop_keys();
                raw.props
                    .into_iter()
                    .partition(|(k, _)| keys.contains(&k.as_str()))
            }
            None => (raw.props, Map::new()),
        };
        ComponentNode {
            id: raw.id,
            name: raw.name,
            body: ComponentBody::from_parts(&raw.component_type, props),
            extra,
            children: raw.children,
        }
    }
}

impl From<ComponentNode> for RawComponentNode {
    fn from(node: ComponentNode) -> Self {
        let mut props = node.body.to_props();
        for (k, v) in node.extra {
            props.entry(k).or_insert(v);
        }
        RawComponentNode {
            component_type: node.body.type_name().to_string(),
            props,
            id: node.id,
            name: node.name,
            children: node.children,
        }
    }
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, body: ComponentBody) -> Self {
        ComponentNode {
            id: id.into(),
            name: name.into(),
            body,
            extra: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ComponentNode>) -> Self {
        self.children = children;
        self
    }

    pub fn component_type(&self) -> Option<ComponentType> {
        self.body.component_type()
    }

    pub fn type_name(&self) -> &str {
        self.body.type_name()
    }

    /// Pre-order walk. `path` is the structural locator of `self`
    /// (e.g. `root`), children get `<path>.children[i]`.
    pub fn visit<'a, F>(&'a self, path: &str, f: &mut F)
    where
        F: FnMut(&'a ComponentNode, &str),
    {
        f(self, path);
        for (i, child) in self.children.iter().enumerate() {
            child.visit(&format!("{}.children[{}]", path, i), f);
        }
    }

    /// Find a node by id anywhere in this subtree.
    pub fn find(&self, id: &str) -> Option<&ComponentNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Structural locator of the node with `id`, relative to `root_path`.
    pub fn path_of(&self, id: &str, root_path: &str) -> Option<String> {
        if self.id == id {
            return Some(root_path.to_string());
        }
        self.children.iter().enumerate().find_map(|(i, c)| {
            c.path_of(id, &format!("{}.children[{}]", root_path, i))
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// All node ids in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit("root", &mut |n, _| out.push(n.id.as_str()));
        out
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ComponentNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_node_roundtrips_wire_shape() {
        let wire = json!({
            "id": "p/title",
            "type": "Heading",
            "name": "title",
            "props": {"text": "订单页", "level": 1},
            "children": []
        });
        let node: ComponentNode = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            node.body,
            ComponentBody::Heading {
                text: "订单页".to_string(),
                level: 1
            }
        );
        assert_eq!(serde_json::to_value(&node).unwrap(), wire);
    }

    #[test]
    fn unknown_type_becomes_custom_and_keeps_props() {
        let wire = json!({
            "id": "chart",
            "type": "Chart",
            "name": "sales",
            "props": {"series": [1, 2, 3]},
            "children": []
        });
        let node: ComponentNode = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(node.component_type(), None);
        assert_eq!(node.type_name(), "Chart");
        assert_eq!(serde_json::to_value(&node).unwrap(), wire);
    }

    #[test]
    fn unmodeled_props_survive_roundtrip() {
        let wire = json!({
            "id": "ok",
            "type": "Button",
            "name": "ok",
            "props": {"label": "OK", "variant": "primary", "disabled": true},
            "children": []
        });
        let node: ComponentNode = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            node.body,
            ComponentBody::Button {
                label: "OK".to_string()
            }
        );
        assert_eq!(node.extra.len(), 2);
        assert_eq!(node.extra["variant"], json!("primary"));
        assert_eq!(serde_json::to_value(&node).unwrap(), wire);
    }

    #[test]
    fn custom_nodes_keep_no_extra() {
        let node: ComponentNode = serde_json::from_value(
            json!({"id": "c", "type": "Chart", "name": "c", "props": {"x": 1}}),
        )
        .unwrap();
        assert!(node.extra.is_empty());
    }

    #[test]
    fn missing_props_default() {
        let node: ComponentNode =
            serde_json::from_value(json!({"id": "b", "type": "Button", "name": "ok"})).unwrap();
        assert_eq!(
            node.body,
            ComponentBody::Button {
                label: String::new()
            }
        );
        assert!(node.children.is_empty());
    }

    #[test]
    fn find_and_paths() {
        let tree = ComponentNode::new("root", "root", ComponentBody::Page).with_children(vec![
            ComponentNode::new("a", "a", ComponentBody::Container).with_children(vec![
                ComponentNode::new(
                    "b",
                    "b",
                    ComponentBody::Text {
                        text: "hi".to_string(),
                    },
                ),
            ]),
        ]);
        assert!(tree.contains("b"));
        assert_eq!(
            tree.path_of("b", "root").as_deref(),
            Some("root.children[0].children[0]")
        );
        assert_eq!(tree.ids(), vec!["root", "a", "b"]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn parse_matches_every_whitelisted_name() {
        for t in ComponentType::ALL {
            assert_eq!(ComponentType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ComponentType::parse("Chart"), None);
    }
}
