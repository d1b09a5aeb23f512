//! Deterministic id construction.
//!
//! Every id is a pure function of the section path, the sibling index and
//! the slugified label. Nothing random or time-based goes in, so compiling
//! the same PRD twice yields identical ids, and editing one line only
//! changes the ids derived from that line.

use std::collections::HashSet;

/// Maximum slug length in characters.
const MAX_SLUG_CHARS: usize = 48;

/// Lowercase, keep (Unicode) alphanumerics, collapse everything else to `-`.
pub fn slugify(text: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.chars().count() > MAX_SLUG_CHARS {
        out = out.chars().take(MAX_SLUG_CHARS).collect();
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// Hands out unique ids within one scope (a page's nodes, a page's
/// interactions, ...). The sibling index is only consulted when the label
/// slugifies to nothing; collisions get `-2`, `-3`, ... in encounter order.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `<prefix><sep><slug(label)>`, falling back to the 1-based
    /// sibling index when the slug is empty.
    pub fn allocate(&mut self, prefix: &str, sep: &str, label: &str, sibling_index: usize) -> String {
        let slug = slugify(label);
        let leaf = if slug.is_empty() {
            (sibling_index + 1).to_string()
        } else {
            slug
        };
        let base = if prefix.is_empty() {
            leaf
        } else {
            format!("{}{}{}", prefix, sep, leaf)
        };
        self.claim(base)
    }

    /// Reserve `base` verbatim, or the first free `base-N`.
    pub fn claim(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
