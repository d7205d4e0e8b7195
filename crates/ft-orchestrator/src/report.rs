//! Evaluation report types.

use chrono::{DateTime, Utc};
use ft_core::{Domain, EngineResult, Recommendation, Severity, Status};
use ft_profile::ValidationIssue;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a domain produced no result this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The measurement group was absent or empty; a deliberate skip.
    NoMeasurements,
    /// An error-severity validation issue touches this domain's fields.
    ValidationBlocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDomain {
    pub domain: Domain,
    pub reason: SkipReason,
}

/// One domain's contribution to the report. For engine domains `details`
/// carries the full engine result; the synthetic `Controls` entry carries
/// correlation findings only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain: Domain,
    /// True when the domain status is at or below `Warning`.
    pub ok: bool,
    pub findings: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EngineResult>,
}

impl DomainResult {
    pub fn from_engine(result: EngineResult) -> Self {
        Self {
            domain: result.domain,
            ok: result.status <= Status::Warning,
            findings: result.recommendations.clone(),
            details: Some(result),
        }
    }

    pub fn controls(findings: Vec<Recommendation>) -> Self {
        let status = findings
            .iter()
            .map(|f| status_for_severity(f.severity))
            .fold(Status::Unknown, Status::max);
        Self {
            domain: Domain::Controls,
            ok: status <= Status::Warning,
            findings,
            details: None,
        }
    }

    /// The status this entry contributes to the overall aggregation.
    pub fn status(&self) -> Status {
        match &self.details {
            Some(result) => result.status,
            None => self
                .findings
                .iter()
                .map(|f| status_for_severity(f.severity))
                .fold(Status::Unknown, Status::max),
        }
    }
}

/// Map a finding severity back onto the status scale for aggregation.
pub fn status_for_severity(severity: Severity) -> Status {
    match severity {
        Severity::Critical => Status::Critical,
        Severity::Alert => Status::Alert,
        Severity::Advisory => Status::Warning,
        Severity::Info => Status::Ok,
    }
}

/// The complete output of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile_id: String,
    pub validation: Vec<ValidationIssue>,
    pub skipped_domains: Vec<SkippedDomain>,
    pub domain_results: Vec<DomainResult>,
    pub overall_status: Status,
}

impl EvaluationReport {
    pub fn domain(&self, domain: Domain) -> Option<&DomainResult> {
        self.domain_results.iter().find(|r| r.domain == domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::Intent;

    #[test]
    fn severity_maps_onto_status_scale() {
        assert_eq!(status_for_severity(Severity::Critical), Status::Critical);
        assert_eq!(status_for_severity(Severity::Info), Status::Ok);
    }

    #[test]
    fn controls_entry_status_follows_worst_finding() {
        let findings = vec![
            Recommendation::new(
                "verify_mode_command",
                Domain::Controls,
                Severity::Alert,
                Intent::Routing,
                "Reversing valve position disagrees with the commanded mode",
            ),
            Recommendation::new(
                "note",
                Domain::Controls,
                Severity::Info,
                Intent::Diagnostic,
                "informational",
            ),
        ];
        let entry = DomainResult::controls(findings);
        assert_eq!(entry.status(), Status::Alert);
        assert!(!entry.ok);
    }
}
