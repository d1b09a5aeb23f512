//! Pass 4: Review scoring -- estimate how far the compiled output can be
//! trusted without a human looking at it.

use protospec_interchange::{CompilerWarning, PageSpec, ReviewSummary};

use crate::pass2_sections::{RawPage, SectionKind};

const NO_INTERACTIONS: f64 = 0.3;
const NO_CRITERIA: f64 = 0.2;
const FALLBACK_TITLE: f64 = 0.2;
const NO_GROUPS: f64 = 0.1;
const PER_WARNING: f64 = 0.05;
const MAX_WARNING_PENALTY: f64 = 0.3;

pub fn review(
    raw_pages: &[RawPage],
    pages: &[PageSpec],
    warnings: &[CompilerWarning],
    threshold: f64,
) -> ReviewSummary {
    let mut confidence = 1.0;
    let mut reasons = Vec::new();

    let has_interactions = pages.iter().any(|p| !p.interactions.is_empty());
    let has_criteria = pages.iter().any(|p| !p.acceptance_criteria.is_empty());
    let has_groups = raw_pages
        .iter()
        .flat_map(|p| &p.sections)
        .any(|s| s.kind == SectionKind::Group);

    if !has_interactions {
        confidence -= NO_INTERACTIONS;
        reasons.push("no interactions found".to_string());
    }
    if !has_criteria {
        confidence -= NO_CRITERIA;
        reasons.push("no acceptance criteria found".to_string());
    }
    if raw_pages.iter().any(|p| p.fallback_title) {
        confidence -= FALLBACK_TITLE;
        reasons.push("title taken from source metadata, not a '#' heading".to_string());
    }
    if !has_groups {
        confidence -= NO_GROUPS;
        reasons.push("no component groups declared".to_string());
    }
    if !warnings.is_empty() {
        confidence -= (PER_WARNING * warnings.len() as f64).min(MAX_WARNING_PENALTY);
        reasons.push(format!("{} compiler warning(s)", warnings.len()));
    }

    let confidence = ((confidence.max(0.0_f64)) * 100.0).round() / 100.0;
    if confidence < threshold {
        reasons.push(format!(
            "confidence {:.2} is below the review threshold {:.2}",
            confidence, threshold
        ));
    }

    ReviewSummary {
        confidence,
        needs_human_review: confidence < threshold || !has_interactions || !has_criteria,
        reasons,
    }
}
