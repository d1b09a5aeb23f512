//! Pass 1: Outline lexing -- split PRD markdown into classified lines
//! (headings, bullets, paragraphs, blanks) with 1-based line numbers.

use crate::error::{codes, PrdCompilerError};

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Heading {
        level: u8,
        text: String,
    },
    Bullet {
        /// Leading whitespace width (tabs count as 4).
        indent: usize,
        text: String,
        /// `Some(done)` for `- [ ]` / `- [x]` task items.
        checked: Option<bool>,
    },
    Paragraph(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLine {
    pub kind: LineKind,
    pub line: u32,
}

pub fn lex(src: &str) -> Result<Vec<OutlineLine>, PrdCompilerError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut out = Vec::new();
    let mut fence_open: Option<u32> = None;

    for (idx, raw) in src.lines().enumerate() {
        let line = (idx + 1) as u32;
        let trimmed_end = raw.trim_end();
        let content = trimmed_end.trim_start();

        if content.starts_with("```") || content.starts_with("~~~") {
            fence_open = match fence_open {
                Some(_) => None,
                None => Some(line),
            };
            continue;
        }
        if fence_open.is_some() {
            out.push(OutlineLine {
                kind: LineKind::Paragraph(trimmed_end.to_string()),
                line,
            });
            continue;
        }

        let kind = if content.is_empty() || is_thematic_break(content) {
            LineKind::Blank
        } else if let Some(heading) = lex_heading(content, raw, line)? {
            heading
        } else if let Some(bullet) = lex_bullet(trimmed_end) {
            bullet
        } else {
            LineKind::Paragraph(content.to_string())
        };
        out.push(OutlineLine { kind, line });
    }

    if let Some(start) = fence_open {
        return Err(PrdCompilerError::new(
            codes::UNTERMINATED_CODE_FENCE,
            format!("code fence opened at line {} is never closed", start),
        )
        .at_line(start));
    }

    Ok(out)
}

/// `---`, `***`, `___` separators carry no content.
fn is_thematic_break(content: &str) -> bool {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|m| compact.chars().all(|c| c == *m))
}

/// Recognize an ATX heading. `#tag` (no space) is not a heading.
fn lex_heading(content: &str, raw: &str, line: u32) -> Result<Option<LineKind>, PrdCompilerError> {
    // More than three spaces of indentation makes it a code line in markdown.
    let indent = raw.len() - raw.trim_start().len();
    if indent > 3 || !content.starts_with('#') {
        return Ok(None);
    }
    let hashes = content.chars().take_while(|c| *c == '#').count();
    let rest = &content[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Ok(None);
    }
    if hashes > 6 {
        return Err(PrdCompilerError::new(
            codes::MALFORMED_HEADING,
            format!("heading marker '{}' is deeper than six levels", "#".repeat(hashes)),
        )
        .at_line(line)
        .with_detail("marker", "#".repeat(hashes)));
    }
    let text = rest.trim().trim_end_matches('#').trim();
    if text.is_empty() {
        return Err(PrdCompilerError::new(
            codes::MALFORMED_HEADING,
            "heading has no text",
        )
        .at_line(line)
        .with_detail("marker", "#".repeat(hashes)));
    }
    Ok(Some(LineKind::Heading {
        level: hashes as u8,
        text: text.to_string(),
    }))
}

fn lex_bullet(line: &str) -> Option<LineKind> {
    let mut indent = 0usize;
    for c in line.chars() {
        match c {
            ' ' => indent += 1,
            '\t' => indent += 4,
            _ => break,
        }
    }
    let body = line.trim_start();

    let rest = if let Some(r) = ["- ", "* ", "+ ", "• "]
        .iter()
        .find_map(|m| body.strip_prefix(*m))
    {
        r
    } else {
        // Ordered list: `1. item` or `1) item`
        let digits = body.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let after = &body[digits..];
        after
            .strip_prefix(". ")
            .or_else(|| after.strip_prefix(") "))?
    };

    let rest = rest.trim();
    let (checked, text) = if let Some(t) = rest.strip_prefix("[ ]") {
        (Some(false), t.trim())
    } else if let Some(t) = rest
        .strip_prefix("[x]")
        .or_else(|| rest.strip_prefix("[X]"))
    {
        (Some(true), t.trim())
    } else {
        (None, rest)
    };

    Some(LineKind::Bullet {
        indent,
        text: text.to_string(),
        checked,
    })
}
