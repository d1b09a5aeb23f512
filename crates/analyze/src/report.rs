//! QualityGateReport: the outcome of one gate run.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Schema,
    Traceability,
    InteractionReplay,
}

impl CheckName {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckName::Schema => "schema",
            CheckName::Traceability => "traceability",
            CheckName::InteractionReplay => "interaction_replay",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateCheck {
    pub name: CheckName,
    pub passed: bool,
    pub details: Vec<String>,
    pub duration_ms: u64,
}

impl GateCheck {
    pub(crate) fn from_details(name: CheckName, details: Vec<String>, duration_ms: u64) -> Self {
        GateCheck {
            name,
            passed: details.is_empty(),
            details,
            duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateReport {
    pub spec_id: String,
    pub passed: bool,
    pub checks: Vec<GateCheck>,
}

impl QualityGateReport {
    pub fn new(spec_id: impl Into<String>, checks: Vec<GateCheck>) -> Self {
        QualityGateReport {
            spec_id: spec_id.into(),
            passed: checks.iter().all(|c| c.passed),
            checks,
        }
    }

    pub fn check(&self, name: CheckName) -> Option<&GateCheck> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn failed(&self) -> impl Iterator<Item = &GateCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

impl fmt::Display for QualityGateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quality gate for {}", self.spec_id)?;
        for check in &self.checks {
            let mark = if check.passed { "PASS" } else { "FAIL" };
            writeln!(f, "  [{}] {} ({}ms)", mark, check.name, check.duration_ms)?;
            for detail in &check.details {
                writeln!(f, "         {}", detail)?;
            }
        }
        let verdict = if self.passed { "PASSED" } else { "FAILED" };
        write!(f, "{}", verdict)
    }
}
