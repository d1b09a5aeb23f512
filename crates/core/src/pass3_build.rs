//! Pass 3: Page building -- turn grouped sections into PageSpecs with
//! component trees, interactions and acceptance criteria.
//!
//! Building runs in two phases per page. Phase one walks the sections and
//! assembles the component tree, collecting interaction lines on the side.
//! Phase two resolves each interaction's target against the finished tree,
//! so an interaction may point at a component declared after it.

use std::collections::HashMap;

use protospec_interchange::{
    AcceptanceCriterion, ActionKind, CompilerWarning, ComponentBody, ComponentNode,
    InteractionAction, InteractionSpec, PageSpec,
};
use serde_json::{json, Value};

use crate::error::codes;
use crate::ids::{slugify, IdAllocator};
use crate::pass2_sections::{RawItem, RawPage, RawSection, SectionKind};

const ARROWS: &[&str] = &["->", "→", "=>"];

// ── Component keyword table ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Textarea,
    Checkbox,
    Radio,
    Select,
    Input,
    Button,
    List,
    Card,
    Image,
    Modal,
    Heading,
    Text,
}

/// Checked in order; the first keyword found anywhere in the line wins.
const KEYWORDS: &[(Kind, &[&str])] = &[
    (Kind::Textarea, &["textarea", "文本域", "多行输入"]),
    (Kind::Checkbox, &["checkbox", "复选", "勾选"]),
    (Kind::Radio, &["radio", "单选"]),
    (Kind::Select, &["select", "dropdown", "下拉", "选择框"]),
    (Kind::Input, &["input", "输入框", "搜索框", "文本框"]),
    (Kind::Button, &["button", "按钮"]),
    (Kind::List, &["list", "列表"]),
    (Kind::Card, &["card", "卡片"]),
    (Kind::Image, &["image", "图片", "图像"]),
    (Kind::Modal, &["modal", "dialog", "弹窗", "对话框"]),
    (Kind::Heading, &["title", "heading", "标题"]),
];

fn classify_component(text: &str) -> Kind {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(kind, _)| *kind)
        .unwrap_or(Kind::Text)
}

/// Options written as `(a/b/c)` or `（a、b、c）` at the end of a line.
fn split_options(text: &str) -> (String, Vec<String>) {
    let open = text.rfind(['(', '（']);
    let close = text.rfind([')', '）']);
    if let (Some(o), Some(c)) = (open, close) {
        if o < c {
            let inner_start = o + text[o..].chars().next().map_or(1, char::len_utf8);
            let options: Vec<String> = text[inner_start..c]
                .split(['/', '、', '|', ',', '，'])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !options.is_empty() {
                return (text[..o].trim().to_string(), options);
            }
        }
    }
    (text.to_string(), Vec::new())
}

fn component_body(text: &str, checked: Option<bool>, under_list: bool) -> ComponentBody {
    if under_list {
        return ComponentBody::ListItem {
            text: text.to_string(),
        };
    }
    match classify_component(text) {
        Kind::Textarea => ComponentBody::Textarea {
            label: text.to_string(),
            placeholder: None,
        },
        Kind::Checkbox => ComponentBody::Checkbox {
            label: text.to_string(),
            checked: checked.unwrap_or(false),
        },
        Kind::Radio => {
            let (label, options) = split_options(text);
            ComponentBody::RadioGroup { label, options }
        }
        Kind::Select => {
            let (label, options) = split_options(text);
            ComponentBody::Select { label, options }
        }
        Kind::Input => ComponentBody::Input {
            label: text.to_string(),
            placeholder: None,
        },
        Kind::Button => ComponentBody::Button {
            label: text.to_string(),
        },
        Kind::List => ComponentBody::List,
        Kind::Card => ComponentBody::Card {
            title: Some(text.to_string()),
        },
        Kind::Image => ComponentBody::Image {
            src: String::new(),
            alt: Some(text.to_string()),
        },
        Kind::Modal => ComponentBody::Modal {
            title: Some(text.to_string()),
        },
        Kind::Heading => ComponentBody::Heading {
            text: text.to_string(),
            level: 3,
        },
        Kind::Text => ComponentBody::Text {
            text: text.to_string(),
        },
    }
}

// ── Interaction lines ───────────────────────────────────────────────

/// An interaction line awaiting target resolution.
#[derive(Debug)]
struct PendingInteraction {
    trigger: String,
    actions_text: String,
    /// Node id of the enclosing group section, if any.
    group_node: Option<String>,
    line: u32,
}

fn split_arrow(text: &str) -> Option<(&str, &str)> {
    ARROWS
        .iter()
        .filter_map(|a| text.find(a).map(|pos| (pos, a.len())))
        .min_by_key(|(pos, _)| *pos)
        .map(|(pos, len)| (text[..pos].trim(), text[pos + len..].trim()))
}

/// Infer the DOM-ish event from the trigger verb. The keyword that appears
/// earliest in the trigger wins.
pub fn infer_event(trigger: &str) -> &'static str {
    let lower = trigger.to_lowercase();
    const EVENTS: &[(&str, &[&str])] = &[
        ("dblclick", &["双击", "double click", "double-click", "dblclick"]),
        ("click", &["点击", "单击", "click", "tap"]),
        ("submit", &["提交", "submit"]),
        ("change", &["输入", "修改", "选择", "change", "type", "select"]),
        ("load", &["进入", "加载", "打开页面", "load", "enter", "open page"]),
        ("hover", &["悬停", "hover", "mouse over"]),
        ("scroll", &["滚动", "scroll"]),
    ];
    EVENTS
        .iter()
        .filter_map(|(event, words)| {
            words
                .iter()
                .filter_map(|w| lower.find(w))
                .min()
                .map(|pos| (pos, *event))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, event)| event)
        .unwrap_or("click")
}

fn action_kind(name: &str) -> ActionKind {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "navigate" | "goto" | "go" | "跳转" | "导航" => ActionKind::Navigate,
        "setstate" | "set" | "设置" | "设置状态" => ActionKind::SetState,
        "callapi" | "api" | "request" | "请求" | "调用接口" => ActionKind::CallApi,
        "openmodal" | "打开弹窗" => ActionKind::OpenModal,
        "closemodal" | "关闭弹窗" => ActionKind::CloseModal,
        "showtoast" | "toast" | "提示" => ActionKind::ShowToast,
        "submitform" | "提交表单" => ActionKind::SubmitForm,
        "" => ActionKind::Custom("unknown".to_string()),
        _ => ActionKind::Custom(name.trim().to_string()),
    }
}

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Parse an action payload for `kind`. `None` means the text could not be
/// understood and the caller keeps it as `{ "raw": … }`.
fn parse_payload(kind: &ActionKind, text: &str) -> Option<Value> {
    let text = text.trim();
    if text.starts_with('{') {
        return serde_json::from_str::<Value>(text)
            .ok()
            .filter(Value::is_object);
    }
    match kind {
        ActionKind::Navigate => (!text.is_empty()).then(|| json!({ "to": text })),
        ActionKind::SetState => {
            let (key, value) = text.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| json!(value));
            Some(json!({ "key": key, "value": value }))
        }
        ActionKind::CallApi => {
            let mut parts = text.split_whitespace();
            let first = parts.next()?;
            let upper = first.to_uppercase();
            if HTTP_METHODS.contains(&upper.as_str()) {
                let url = parts.next()?;
                Some(json!({ "method": upper, "url": url }))
            } else if first.starts_with('/') || first.starts_with("http") {
                Some(json!({ "method": "GET", "url": first }))
            } else {
                None
            }
        }
        ActionKind::OpenModal | ActionKind::CloseModal => Some(if text.is_empty() {
            json!({})
        } else {
            json!({ "modal": text })
        }),
        ActionKind::ShowToast => (!text.is_empty()).then(|| json!({ "message": text })),
        ActionKind::SubmitForm => Some(if text.is_empty() {
            json!({})
        } else {
            json!({ "form": text })
        }),
        ActionKind::Custom(_) => Some(if text.is_empty() {
            json!({})
        } else {
            serde_json::from_str::<Value>(text).unwrap_or_else(|_| json!({ "value": text }))
        }),
    }
}

fn parse_actions(
    text: &str,
    page_id: &str,
    line: u32,
    warnings: &mut Vec<CompilerWarning>,
) -> Vec<InteractionAction> {
    let mut actions = Vec::new();
    for part in text.split([';', '；']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (name, payload_text) = match part.find([':', '：']) {
            Some(pos) => {
                let sep_len = part[pos..].chars().next().map_or(1, char::len_utf8);
                (&part[..pos], &part[pos + sep_len..])
            }
            None => (part, ""),
        };
        let kind = action_kind(name);
        let payload = match parse_payload(&kind, payload_text) {
            Some(p) => p,
            None => {
                warnings.push(warning(
                    codes::ACTION_PAYLOAD_UNPARSED,
                    format!("could not parse '{}' payload: {}", kind, payload_text.trim()),
                    page_id,
                    line,
                ));
                json!({ "raw": payload_text.trim() })
            }
        };
        actions.push(InteractionAction { kind, payload });
    }
    actions
}

// ── Tree assembly ───────────────────────────────────────────────────

fn warning(code: &str, message: impl Into<String>, page_id: &str, line: u32) -> CompilerWarning {
    CompilerWarning {
        code: code.to_string(),
        message: message.into(),
        line: Some(line),
        page_id: Some(page_id.to_string()),
    }
}

/// Turn an indented run of items into component nodes under `parent_id`.
fn build_items(
    items: &[RawItem],
    parent_id: &str,
    under_list: bool,
    ids: &mut IdAllocator,
) -> Vec<ComponentNode> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let item = &items[i];
        let (indent, checked) = match item {
            RawItem::Bullet {
                indent, checked, ..
            } => (*indent, *checked),
            RawItem::Paragraph { .. } => (0, None),
        };
        // Everything more deeply indented that follows belongs to this item.
        let mut end = i + 1;
        while end < items.len() {
            match &items[end] {
                RawItem::Bullet { indent: d, .. } if *d > indent => end += 1,
                _ => break,
            }
        }

        let text = item.text();
        let body = component_body(text, checked, under_list);
        let is_list = matches!(body, ComponentBody::List);
        let id = ids.allocate(parent_id, "/", text, out.len());
        let children = build_items(&items[i + 1..end], &id, is_list, ids);
        out.push(ComponentNode::new(id, text, body).with_children(children));
        i = end;
    }
    out
}

struct PageBuilder<'a> {
    page_id: String,
    ids: IdAllocator,
    root_children: Vec<ComponentNode>,
    /// Section index → position of its node in `root_children`.
    group_slots: HashMap<usize, usize>,
    pending: Vec<PendingInteraction>,
    criteria: Vec<AcceptanceCriterion>,
    warnings: &'a mut Vec<CompilerWarning>,
}

impl PageBuilder<'_> {
    /// Parent node id and current child count for nodes of a section
    /// nested under `group` (or directly under the page root).
    fn parent_of(&self, group: Option<usize>) -> (Option<usize>, String, usize) {
        match group.and_then(|g| self.group_slots.get(&g).copied()) {
            Some(slot) => {
                let node = &self.root_children[slot];
                (Some(slot), node.id.clone(), node.children.len())
            }
            None => (None, self.page_id.clone(), self.root_children.len()),
        }
    }

    fn push_node(&mut self, slot: Option<usize>, node: ComponentNode) {
        match slot {
            Some(slot) => self.root_children[slot].children.push(node),
            None => self.root_children.push(node),
        }
    }

    fn section(&mut self, idx: usize, section: &RawSection) {
        match section.kind {
            SectionKind::Group => {
                let id = self.ids.allocate(&self.page_id, "/", &section.label, idx);
                let children = build_items(&section.items, &id, false, &mut self.ids);
                let node = ComponentNode::new(
                    id,
                    section.label.clone(),
                    ComponentBody::Section {
                        title: Some(section.label.clone()),
                    },
                )
                .with_children(children);
                self.group_slots.insert(idx, self.root_children.len());
                self.root_children.push(node);
            }
            SectionKind::Interactions => {
                let group_node = section
                    .group
                    .and_then(|g| self.group_slots.get(&g))
                    .map(|slot| self.root_children[*slot].id.clone());
                for item in &section.items {
                    self.interaction_line(item, section.group, group_node.clone());
                }
            }
            SectionKind::Acceptance => {
                for item in &section.items {
                    let checked = match item {
                        RawItem::Bullet { checked, .. } => *checked,
                        RawItem::Paragraph { .. } => None,
                    };
                    let n = self.criteria.len() + 1;
                    self.criteria.push(AcceptanceCriterion {
                        id: format!("{}:ac:{}", self.page_id, n),
                        description: item.text().to_string(),
                        completed: checked == Some(true),
                    });
                }
            }
            // Folded into the summary before building.
            SectionKind::Overview => {}
            SectionKind::Unknown => {
                self.warnings.push(warning(
                    codes::UNRECOGNIZED_SECTION,
                    format!("unrecognized section '{}' rendered as text", section.heading),
                    &self.page_id,
                    section.line,
                ));
                let (slot, parent_id, sibling) = self.parent_of(section.group);
                let id = self.ids.allocate(&parent_id, "/", &section.label, sibling);
                let mut children = Vec::with_capacity(section.items.len());
                for (i, item) in section.items.iter().enumerate() {
                    let text = item.text();
                    children.push(ComponentNode::new(
                        self.ids.allocate(&id, "/", text, i),
                        text,
                        ComponentBody::Text {
                            text: text.to_string(),
                        },
                    ));
                }
                let node = ComponentNode::new(
                    id,
                    section.label.clone(),
                    ComponentBody::Section {
                        title: Some(section.heading.clone()),
                    },
                )
                .with_children(children);
                self.push_node(slot, node);
            }
        }
    }

    fn interaction_line(&mut self, item: &RawItem, group: Option<usize>, group_node: Option<String>) {
        let text = item.text();
        let line = item.line();
        match split_arrow(text) {
            Some((trigger, actions_text)) if !trigger.is_empty() => {
                self.pending.push(PendingInteraction {
                    trigger: trigger.to_string(),
                    actions_text: actions_text.to_string(),
                    group_node,
                    line,
                });
            }
            _ => {
                self.warnings.push(warning(
                    codes::INTERACTION_UNPARSED,
                    format!("interaction line has no '<trigger> -> <action>' form: {}", text),
                    &self.page_id,
                    line,
                ));
                let (slot, parent_id, sibling) = self.parent_of(group);
                let id = self.ids.allocate(&parent_id, "/", text, sibling);
                let node = ComponentNode::new(
                    id,
                    text,
                    ComponentBody::Text {
                        text: text.to_string(),
                    },
                );
                self.push_node(slot, node);
            }
        }
    }
}

/// The node whose name occurs in `trigger`; the longest name wins, ties go
/// to the first in document order. The page root and its title/summary
/// nodes are never candidates.
fn match_target(root: &ComponentNode, trigger: &str, excluded: &[&str]) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    root.visit("root", &mut |node, _| {
        if node.name.is_empty() || excluded.contains(&node.id.as_str()) {
            return;
        }
        if trigger.contains(node.name.as_str()) {
            let len = node.name.chars().count();
            if best.as_ref().map_or(true, |(l, _)| len > *l) {
                best = Some((len, node.id.clone()));
            }
        }
    });
    best.map(|(_, id)| id)
}

fn build_page(
    raw: &RawPage,
    page_id: String,
    warnings: &mut Vec<CompilerWarning>,
) -> PageSpec {
    let slug = page_id
        .strip_prefix("page-")
        .unwrap_or(&page_id)
        .to_string();

    let mut summary_lines = raw.summary.clone();
    for section in &raw.sections {
        if section.kind == SectionKind::Overview {
            summary_lines.extend(section.items.iter().map(|i| i.text().to_string()));
        }
    }
    let summary = summary_lines.join("\n");

    for (idx, section) in raw.sections.iter().enumerate() {
        let has_subsections = raw.sections.iter().any(|s| s.group == Some(idx));
        if section.items.is_empty() && !has_subsections {
            warnings.push(warning(
                codes::EMPTY_SECTION,
                format!("section '{}' has no content", section.heading),
                &page_id,
                section.line,
            ));
        }
    }

    let mut ids = IdAllocator::new();
    ids.claim(page_id.clone());
    let title_id = ids.claim(format!("{}/title", page_id));
    let summary_id = ids.claim(format!("{}/summary", page_id));

    let mut builder = PageBuilder {
        page_id: page_id.clone(),
        ids,
        root_children: vec![
            ComponentNode::new(
                title_id.clone(),
                "title",
                ComponentBody::Heading {
                    text: raw.title.clone(),
                    level: 1,
                },
            ),
            ComponentNode::new(
                summary_id.clone(),
                "summary",
                ComponentBody::Text {
                    text: summary.clone(),
                },
            ),
        ],
        group_slots: HashMap::new(),
        pending: Vec::new(),
        criteria: Vec::new(),
        warnings,
    };
    for (idx, section) in raw.sections.iter().enumerate() {
        builder.section(idx, section);
    }

    let PageBuilder {
        root_children,
        pending,
        criteria,
        warnings,
        ..
    } = builder;
    let root = ComponentNode::new(page_id.clone(), raw.title.clone(), ComponentBody::Page)
        .with_children(root_children);

    // Phase two: resolve targets against the finished tree.
    let excluded = [page_id.as_str(), title_id.as_str(), summary_id.as_str()];
    let mut ix_ids = IdAllocator::new();
    let mut interactions = Vec::with_capacity(pending.len());
    for (i, p) in pending.into_iter().enumerate() {
        let id = ix_ids.allocate(&page_id, ":ix:", &p.trigger, i);
        let actions = parse_actions(&p.actions_text, &page_id, p.line, warnings);
        if actions.is_empty() {
            warnings.push(warning(
                codes::INTERACTION_WITHOUT_ACTIONS,
                format!("interaction '{}' has no actions", p.trigger),
                &page_id,
                p.line,
            ));
        }
        let target = match match_target(&root, &p.trigger, &excluded).or(p.group_node) {
            Some(t) => t,
            None => {
                warnings.push(warning(
                    codes::INTERACTION_TARGET_FALLBACK,
                    format!(
                        "no component matches '{}'; targeting the page root",
                        p.trigger
                    ),
                    &page_id,
                    p.line,
                ));
                page_id.clone()
            }
        };
        interactions.push(InteractionSpec {
            id,
            event: infer_event(&p.trigger).to_string(),
            name: p.trigger,
            actions,
            target_node_id: Some(target),
        });
    }

    PageSpec {
        id: page_id,
        slug,
        title: raw.title.clone(),
        summary,
        root,
        interactions,
        acceptance_criteria: criteria,
    }
}

/// Build one PageSpec per raw page. Page ids are `page-<slug>`; a repeated
/// title gets a suffixed id and a `DUPLICATE_PAGE_TITLE` warning.
pub fn build_pages(raw_pages: &[RawPage], warnings: &mut Vec<CompilerWarning>) -> Vec<PageSpec> {
    let mut page_ids = IdAllocator::new();
    let mut seen_titles: HashMap<String, u32> = HashMap::new();
    let mut pages = Vec::with_capacity(raw_pages.len());

    for (i, raw) in raw_pages.iter().enumerate() {
        let page_id = page_ids.allocate("page", "-", &raw.title, i);
        let key = slugify(&raw.title);
        if let Some(first_line) = seen_titles.get(&key) {
            warnings.push(warning(
                codes::DUPLICATE_PAGE_TITLE,
                format!(
                    "page title '{}' repeats the page at line {}",
                    raw.title, first_line
                ),
                &page_id,
                raw.line,
            ));
        } else {
            seen_titles.insert(key, raw.line);
        }
        pages.push(build_page(raw, page_id, warnings));
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass1_outline::lex;
    use crate::pass2_sections::group_sections;

    fn build(src: &str) -> (Vec<PageSpec>, Vec<CompilerWarning>) {
        let mut w = Vec::new();
        let raw = group_sections(&lex(src).unwrap(), None, &mut w).unwrap();
        let pages = build_pages(&raw, &mut w);
        (pages, w)
    }

    const ORDERS: &str = "# 订单页\n## 页面 列表\n- 列表展示订单\n### 交互\n- 点击订单 -> navigate: /orders/1\n### 验收标准\n- 用户可查看订单列表\n";

    #[test]
    fn orders_fixture_shape() {
        let (pages, _) = build(ORDERS);
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        assert_eq!(page.id, "page-订单页");
        assert_eq!(page.slug, "订单页");
        let ids = page.root.ids();
        assert!(ids.contains(&"page-订单页/title"));
        assert!(ids.contains(&"page-订单页/列表"));
        assert!(ids.contains(&"page-订单页/列表/列表展示订单"));

        assert_eq!(page.interactions.len(), 1);
        let ix = &page.interactions[0];
        assert_eq!(ix.id, "page-订单页:ix:点击订单");
        assert_eq!(ix.event, "click");
        assert_eq!(ix.actions[0].kind, ActionKind::Navigate);
        assert_eq!(ix.actions[0].payload, json!({"to": "/orders/1"}));
        // Falls back to the enclosing group.
        assert_eq!(ix.target_node_id.as_deref(), Some("page-订单页/列表"));

        assert_eq!(page.acceptance_criteria[0].id, "page-订单页:ac:1");
    }

    #[test]
    fn named_component_is_targeted() {
        let (pages, _) = build(
            "# Login\n## Page Form\n- Email input\n- Submit button\n## Interactions\n- click Submit button -> callApi: POST /login; navigate: /home\n",
        );
        let ix = &pages[0].interactions[0];
        assert_eq!(ix.target_node_id.as_deref(), Some("page-login/form/submit-button"));
        assert_eq!(ix.actions.len(), 2);
        assert_eq!(
            ix.actions[0].payload,
            json!({"method": "POST", "url": "/login"})
        );
    }

    #[test]
    fn root_fallback_warns() {
        let (pages, w) = build("# T\n## 交互\n- 进入页面 -> showToast: hi\n");
        let ix = &pages[0].interactions[0];
        assert_eq!(ix.target_node_id.as_deref(), Some("page-t"));
        assert_eq!(ix.event, "load");
        assert!(w.iter().any(|w| w.code == codes::INTERACTION_TARGET_FALLBACK));
    }

    #[test]
    fn list_children_become_list_items() {
        let (pages, _) = build("# T\n## 页面 主页\n- 订单列表\n  - 第一项\n  - 第二项\n");
        let list = pages[0].root.find("page-t/主页/订单列表").unwrap();
        assert_eq!(list.body, ComponentBody::List);
        assert_eq!(list.children.len(), 2);
        assert!(matches!(list.children[0].body, ComponentBody::ListItem { .. }));
    }

    #[test]
    fn select_options_are_parsed() {
        let (pages, _) = build("# T\n## Page P\n- 状态下拉（全部/待支付/已完成）\n");
        let node = &pages[0].root.children[2].children[0];
        assert_eq!(
            node.body,
            ComponentBody::Select {
                label: "状态下拉".to_string(),
                options: vec!["全部".into(), "待支付".into(), "已完成".into()],
            }
        );
    }

    #[test]
    fn unparsed_lines_and_payloads_warn() {
        let (pages, w) = build("# T\n## 交互\n- just some prose\n- 点击 -> setState: nokey\n");
        assert!(w.iter().any(|w| w.code == codes::INTERACTION_UNPARSED));
        assert!(w.iter().any(|w| w.code == codes::ACTION_PAYLOAD_UNPARSED));
        let ix = &pages[0].interactions[0];
        assert_eq!(ix.actions[0].payload, json!({"raw": "nokey"}));
        assert!(pages[0]
            .root
            .children
            .iter()
            .any(|n| n.name == "just some prose"));
    }

    #[test]
    fn unknown_and_empty_sections_warn() {
        let (pages, w) = build("# T\n## 数据字典\n- a\n## 验收标准\n");
        assert!(w.iter().any(|w| w.code == codes::UNRECOGNIZED_SECTION));
        assert!(w.iter().any(|w| w.code == codes::EMPTY_SECTION));
        assert!(pages[0].root.find("page-t/数据字典/a").is_some());
    }

    #[test]
    fn duplicate_titles_get_distinct_ids() {
        let (pages, w) = build("# Same\n# Same\n");
        assert_eq!(pages[0].id, "page-same");
        assert_eq!(pages[1].id, "page-same-2");
        assert!(w.iter().any(|w| w.code == codes::DUPLICATE_PAGE_TITLE));
    }

    #[test]
    fn payload_edit_keeps_interaction_id() {
        let (a, _) = build(ORDERS);
        let (b, _) = build(&ORDERS.replace("/orders/1", "/orders/latest"));
        assert_eq!(a[0].interactions[0].id, b[0].interactions[0].id);
        assert_ne!(a[0].interactions[0].actions, b[0].interactions[0].actions);
    }

    #[test]
    fn event_vocabulary() {
        assert_eq!(infer_event("双击行"), "dblclick");
        assert_eq!(infer_event("提交表单"), "submit");
        assert_eq!(infer_event("hover card"), "hover");
        assert_eq!(infer_event("滚动到底部"), "scroll");
        assert_eq!(infer_event("something"), "click");
    }
}
