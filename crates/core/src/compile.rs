//! Compilation orchestrator -- runs passes 1-4 in order and assembles the
//! ProtoSpec document.
//!
//! Each pass is a separate module; this module only sequences them and
//! stamps the document metadata. The finished spec is run through the
//! validator before it is returned.

use protospec_interchange::{
    CompilerWarning, DesignTokens, PrdSource, ProtoSpec, ReviewSummary, SourceType, SpecMeta,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{codes, CompileError, PrdCompilerError};
use crate::{pass1_outline, pass2_sections, pass3_build, pass4_review, validate};

/// Knobs for one compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOptions {
    /// Confidence below which `needsHumanReview` is set.
    pub review_threshold: f64,
    /// Spec id to stamp; a fresh UUID when `None`.
    pub spec_id: Option<String>,
    /// RFC 3339 timestamp to stamp; the current time when `None`.
    pub generated_at: Option<String>,
    pub tokens: DesignTokens,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            review_threshold: 0.7,
            spec_id: None,
            generated_at: None,
            tokens: DesignTokens::light(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub spec: ProtoSpec,
    pub warnings: Vec<CompilerWarning>,
    pub review: ReviewSummary,
}

/// Lowercase hex SHA-256 of the PRD content.
pub fn source_hash(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Resolve a `sourceType` name as it appears in requests.
pub fn parse_source_type(name: &str) -> Result<SourceType, PrdCompilerError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "markdown" | "md" => Ok(SourceType::Markdown),
        other => Err(PrdCompilerError::new(
            codes::UNSUPPORTED_SOURCE_TYPE,
            format!("unsupported source type '{}'", other),
        )
        .with_detail("sourceType", other)),
    }
}

/// Compile a PRD into a ProtoSpec.
///
/// Structural problems in the PRD come back as [`CompileError::Prd`]; a spec
/// that fails the validator is a compiler bug and comes back as
/// [`CompileError::Internal`].
pub fn compile_prd_to_proto_spec(
    source: &PrdSource,
    options: &CompilerOptions,
) -> Result<CompileOutput, CompileError> {
    if source.content.trim().is_empty() {
        return Err(PrdCompilerError::new(codes::EMPTY_SOURCE, "PRD source is empty").into());
    }

    let mut warnings = Vec::new();

    // Pass 1: lex
    let lines = pass1_outline::lex(&source.content)?;

    // Pass 2: group into pages and sections
    let raw_pages =
        pass2_sections::group_sections(&lines, source.title.as_deref(), &mut warnings)?;

    // Pass 3: build pages
    let pages = pass3_build::build_pages(&raw_pages, &mut warnings);

    // Pass 4: review
    let review = pass4_review::review(&raw_pages, &pages, &warnings, options.review_threshold);

    let generated_at = match &options.generated_at {
        Some(ts) => ts.clone(),
        None => OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| CompileError::Internal(format!("timestamp formatting failed: {}", e)))?,
    };
    let title = source
        .title
        .clone()
        .or_else(|| raw_pages.first().map(|p| p.title.clone()));

    let spec = ProtoSpec {
        id: options
            .spec_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        meta: SpecMeta {
            project_id: source.project_id.clone(),
            generated_at,
            source_hash: source_hash(&source.content),
            compiler_version: crate::COMPILER_VERSION.to_string(),
            title,
        },
        tokens: options.tokens.clone(),
        pages,
    };

    let report = validate::validate_proto_spec(&spec);
    if !report.valid {
        let first = report
            .issues
            .first()
            .map(|i| format!("{} at {}: {}", i.code, i.path, i.message))
            .unwrap_or_default();
        return Err(CompileError::Internal(format!(
            "compiled spec failed validation ({} issue(s)); first: {}",
            report.issues.len(),
            first
        )));
    }

    Ok(CompileOutput {
        spec,
        warnings,
        review,
    })
}
