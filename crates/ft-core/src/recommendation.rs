//! Schema-validated diagnostic recommendations.
//!
//! A recommendation is a finding, not a work order: it names a suspected
//! condition and what it implies, never repair procedures, labor time, or
//! cost. That content-shape rule is enforced here, not left to style.

use crate::result::Domain;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Recommendation severity, ordered by ascending numeric rank
/// (critical = 0 ... info = 3). Lists are sorted by rank so the most severe
/// findings come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Alert,
    Advisory,
    Info,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Alert => 1,
            Severity::Advisory => 2,
            Severity::Info => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Alert => "alert",
            Severity::Advisory => "advisory",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of action the recommendation asks of the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Points at a suspected physical condition.
    Diagnostic,
    /// Flags a condition where continued operation risks damage or injury.
    Safety,
    /// Directs the order of further diagnosis across domains.
    Routing,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendationError {
    #[error("Recommendation id is empty")]
    EmptyId,

    #[error("Recommendation id '{id}' is not snake_case")]
    IdNotSnakeCase { id: String },

    #[error("Recommendation '{id}' has an empty summary")]
    EmptySummary { id: String },

    #[error("Recommendation '{id}' contains forbidden content '{token}' in {field}")]
    ForbiddenContent {
        id: String,
        field: &'static str,
        token: &'static str,
    },
}

/// Phrases that would turn a diagnostic finding into a repair instruction,
/// time estimate, or cost estimate. Checked case-insensitively against
/// summary, rationale, and notes.
const FORBIDDEN_TOKENS: &[&str] = &[
    "$",
    "cost",
    "labor",
    "man-hour",
    "hours to",
    "minutes to",
    "replace the",
    "install a",
    "repair the",
    "braze",
    "solder",
    "recharge with",
    "step 1",
];

/// An immutable, schema-validated diagnostic recommendation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub domain: Domain,
    pub severity: Severity,
    pub intent: Intent,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_shutdown: bool,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        domain: Domain,
        severity: Severity,
        intent: Intent,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            domain,
            severity,
            intent,
            summary: summary.into(),
            rationale: None,
            notes: Vec::new(),
            requires_shutdown: false,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_shutdown(mut self) -> Self {
        self.requires_shutdown = true;
        self
    }

    /// Validate the record against the recommendation schema contract.
    pub fn validate(&self) -> Result<(), RecommendationError> {
        if self.id.is_empty() {
            return Err(RecommendationError::EmptyId);
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(RecommendationError::IdNotSnakeCase {
                id: self.id.clone(),
            });
        }
        if self.summary.trim().is_empty() {
            return Err(RecommendationError::EmptySummary {
                id: self.id.clone(),
            });
        }

        check_content(&self.id, "summary", &self.summary)?;
        if let Some(rationale) = &self.rationale {
            check_content(&self.id, "rationale", rationale)?;
        }
        for note in &self.notes {
            check_content(&self.id, "notes", note)?;
        }
        Ok(())
    }
}

fn check_content(id: &str, field: &'static str, text: &str) -> Result<(), RecommendationError> {
    let lowered = text.to_ascii_lowercase();
    for token in FORBIDDEN_TOKENS {
        if lowered.contains(token) {
            return Err(RecommendationError::ForbiddenContent {
                id: id.to_string(),
                field,
                token,
            });
        }
    }
    Ok(())
}

/// Sort a recommendation list by ascending severity rank, stably, so that
/// ordering never depends on insertion order alone.
pub fn sort_by_severity(recommendations: &mut [Recommendation]) {
    recommendations.sort_by_key(|r| r.severity.rank());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, summary: &str) -> Recommendation {
        Recommendation::new(
            id,
            Domain::Refrigeration,
            Severity::Advisory,
            Intent::Diagnostic,
            summary,
        )
    }

    #[test]
    fn valid_record_passes() {
        let r = rec(
            "low_superheat",
            "Superheat below expected range; suspected overfeeding metering device",
        )
        .with_rationale("Low superheat indicates liquid refrigerant nearing the compressor");
        r.validate().unwrap();
    }

    #[test]
    fn rejects_cost_estimates() {
        let r = rec("bad", "Compressor suspect, roughly $400 cost to address");
        assert!(matches!(
            r.validate(),
            Err(RecommendationError::ForbiddenContent { .. })
        ));
    }

    #[test]
    fn rejects_procedural_steps() {
        let r = rec("bad", "Replace the compressor contactor");
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_non_snake_case_id() {
        let r = rec("Bad-Id", "Summary text");
        assert!(matches!(
            r.validate(),
            Err(RecommendationError::IdNotSnakeCase { .. })
        ));
    }

    #[test]
    fn sorting_is_by_rank_ascending() {
        let mut recs = vec![
            rec("info", "a"),
            Recommendation::new(
                "crit",
                Domain::Airside,
                Severity::Critical,
                Intent::Safety,
                "b",
            ),
        ];
        recs[0].severity = Severity::Info;
        sort_by_severity(&mut recs);
        assert_eq!(recs[0].id, "crit");
        assert_eq!(recs[1].id, "info");
    }

    #[test]
    fn serde_round_trip() {
        let r = rec("r1", "Summary").with_note("a note");
        let json = serde_json::to_string(&r).unwrap();
        let back: Recommendation = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
