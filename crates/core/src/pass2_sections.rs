//! Pass 2: Section grouping -- fold the outline into pages and classified
//! sections. `#` starts a page; deeper headings start sections whose kind
//! comes from the heading vocabulary (页面/交互/验收标准/... and English
//! equivalents).

use protospec_interchange::CompilerWarning;

use crate::error::{codes, PrdCompilerError};
use crate::pass1_outline::{LineKind, OutlineLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Declares a component group (`## 页面 列表`).
    Group,
    /// Interaction lines (`### 交互`).
    Interactions,
    /// Acceptance criteria (`### 验收标准`).
    Acceptance,
    /// Extra summary prose (`## 概述`).
    Overview,
    /// Anything else; content degrades to text.
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawItem {
    Bullet {
        indent: usize,
        text: String,
        checked: Option<bool>,
        line: u32,
    },
    Paragraph {
        text: String,
        line: u32,
    },
}

impl RawItem {
    pub fn text(&self) -> &str {
        match self {
            RawItem::Bullet { text, .. } | RawItem::Paragraph { text, .. } => text,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            RawItem::Bullet { line, .. } | RawItem::Paragraph { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub kind: SectionKind,
    /// Heading text with the section keyword stripped (`列表` for `页面 列表`).
    pub label: String,
    pub heading: String,
    pub level: u8,
    pub line: u32,
    /// Index (within the page) of the enclosing `Group` section, if any.
    pub group: Option<usize>,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub title: String,
    pub line: u32,
    /// True when the title came from `PrdSource.title` rather than a `#` heading.
    pub fallback_title: bool,
    pub summary: Vec<String>,
    pub sections: Vec<RawSection>,
}

const GROUP_PREFIXES: &[&str] = &["页面", "模块", "page", "screen", "view"];
const INTERACTION_PREFIXES: &[&str] = &["交互", "interaction", "behavior", "behaviour"];
const ACCEPTANCE_PREFIXES: &[&str] = &["验收", "acceptance"];
const OVERVIEW_PREFIXES: &[&str] = &[
    "概述",
    "背景",
    "简介",
    "overview",
    "summary",
    "background",
    "description",
];

/// Classify a section heading and strip its keyword.
pub fn classify_heading(text: &str) -> (SectionKind, String) {
    let mut trimmed = text.trim().trim_end_matches([':', '：']).trim();
    if trimmed.is_empty() {
        // Punctuation-only heading: keep it verbatim as the label.
        trimmed = text.trim();
    }

    if let Some(rest) = strip_keyword(trimmed, GROUP_PREFIXES) {
        let label = rest
            .trim_start_matches([':', '：', '-', '—', '·'])
            .trim()
            .to_string();
        let label = if label.is_empty() {
            trimmed.to_string()
        } else {
            label
        };
        return (SectionKind::Group, label);
    }
    for (prefixes, kind) in [
        (INTERACTION_PREFIXES, SectionKind::Interactions),
        (ACCEPTANCE_PREFIXES, SectionKind::Acceptance),
        (OVERVIEW_PREFIXES, SectionKind::Overview),
    ] {
        if strip_keyword(trimmed, prefixes).is_some() {
            return (kind, trimmed.to_string());
        }
    }
    (SectionKind::Unknown, trimmed.to_string())
}

/// Match one of `prefixes` at the start of `text` (ASCII keywords
/// case-insensitively, as a whole word with an optional plural `s`) and
/// return the remainder.
fn strip_keyword<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    for prefix in prefixes {
        let Some(head) = text.get(..prefix.len()) else {
            continue;
        };
        if head.to_lowercase() != *prefix {
            continue;
        }
        let mut rest = &text[prefix.len()..];
        if prefix.is_ascii() {
            if let Some(r) = rest.strip_prefix(['s', 'S']) {
                if !r.starts_with(|c: char| c.is_alphanumeric()) {
                    rest = r;
                }
            }
            if rest.starts_with(|c: char| c.is_ascii_alphanumeric()) {
                continue;
            }
        }
        return Some(rest);
    }
    None
}

/// Fold outline lines into pages.
///
/// `fallback_title` is used when the document has no `#` heading; without
/// it such a document is rejected with `MISSING_TITLE`.
pub fn group_sections(
    lines: &[OutlineLine],
    fallback_title: Option<&str>,
    warnings: &mut Vec<CompilerWarning>,
) -> Result<Vec<RawPage>, PrdCompilerError> {
    let has_h1 = lines
        .iter()
        .any(|l| matches!(l.kind, LineKind::Heading { level: 1, .. }));

    let mut pages: Vec<RawPage> = Vec::new();

    if !has_h1 {
        let title = fallback_title.map(str::trim).unwrap_or("");
        if title.is_empty() {
            return Err(PrdCompilerError::new(
                codes::MISSING_TITLE,
                "document has no top-level '#' heading and no title was provided",
            ));
        }
        pages.push(RawPage {
            title: title.to_string(),
            line: 1,
            fallback_title: true,
            summary: Vec::new(),
            sections: Vec::new(),
        });
    }

    // Stack of (level, section index) for currently open Group sections.
    let mut group_stack: Vec<(u8, usize)> = Vec::new();
    let mut skipped_preamble = false;

    for l in lines {
        match &l.kind {
            LineKind::Heading { level: 1, text } => {
                group_stack.clear();
                pages.push(RawPage {
                    title: text.clone(),
                    line: l.line,
                    fallback_title: false,
                    summary: Vec::new(),
                    sections: Vec::new(),
                });
            }
            LineKind::Heading { level, text } => {
                let Some(page) = pages.last_mut() else {
                    skipped_preamble = true;
                    continue;
                };
                let (kind, label) = classify_heading(text);
                while group_stack.last().is_some_and(|(lvl, _)| *lvl >= *level) {
                    group_stack.pop();
                }
                let group = match kind {
                    SectionKind::Group => None,
                    _ => group_stack.last().map(|(_, idx)| *idx),
                };
                let idx = page.sections.len();
                page.sections.push(RawSection {
                    kind,
                    label,
                    heading: text.clone(),
                    level: *level,
                    line: l.line,
                    group,
                    items: Vec::new(),
                });
                if kind == SectionKind::Group {
                    group_stack.push((*level, idx));
                }
            }
            LineKind::Bullet {
                indent,
                text,
                checked,
            } => {
                let Some(page) = pages.last_mut() else {
                    skipped_preamble = true;
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                match page.sections.last_mut() {
                    Some(section) => section.items.push(RawItem::Bullet {
                        indent: *indent,
                        text: text.clone(),
                        checked: *checked,
                        line: l.line,
                    }),
                    None => page.summary.push(text.clone()),
                }
            }
            LineKind::Paragraph(text) => {
                let Some(page) = pages.last_mut() else {
                    skipped_preamble = true;
                    continue;
                };
                match page.sections.last_mut() {
                    Some(section) => section.items.push(RawItem::Paragraph {
                        text: text.trim().to_string(),
                        line: l.line,
                    }),
                    None => page.summary.push(text.trim().to_string()),
                }
            }
            LineKind::Blank => {}
        }
    }

    if skipped_preamble {
        warnings.push(CompilerWarning {
            code: codes::CONTENT_BEFORE_TITLE.to_string(),
            message: "content before the first '#' heading was ignored".to_string(),
            line: None,
            page_id: None,
        });
    }

    Ok(pages)
}
