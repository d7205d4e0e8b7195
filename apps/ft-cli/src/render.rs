//! Human-readable report rendering.
//!
//! This is a boundary projection of the canonical report shape; nothing in
//! here feeds back into evaluation.

use ft_core::{Severity, Status};
use ft_orchestrator::{DomainResult, EvaluationReport};
use std::fmt::Write;

pub fn render_report(report: &EvaluationReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Evaluation report {}", report.report_id);
    let _ = writeln!(
        out,
        "Profile: {}   Generated: {}",
        report.profile_id,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Overall status: {}", status_label(report.overall_status));

    if !report.validation.is_empty() {
        let _ = writeln!(out, "\nValidation issues:");
        for issue in &report.validation {
            let _ = writeln!(
                out,
                "  [{:?}] {}: {}",
                issue.severity, issue.field, issue.message
            );
        }
    }

    if !report.skipped_domains.is_empty() {
        let _ = writeln!(out, "\nSkipped domains:");
        for skip in &report.skipped_domains {
            let _ = writeln!(out, "  {} ({:?})", skip.domain, skip.reason);
        }
    }

    for result in &report.domain_results {
        render_domain(&mut out, result);
    }

    out
}

fn render_domain(out: &mut String, result: &DomainResult) {
    let _ = writeln!(
        out,
        "\n{} - {}",
        result.domain,
        status_label(result.status())
    );

    if let Some(details) = &result.details {
        for (name, value) in &details.values {
            let _ = writeln!(out, "  {name} = {value:.1}");
        }
        for (check, status) in &details.flags.statuses {
            let _ = writeln!(out, "  {check}: {}", status_label(*status));
        }
    }

    if !result.findings.is_empty() {
        let _ = writeln!(out, "  findings:");
        for finding in &result.findings {
            let shutdown = if finding.requires_shutdown {
                "  [shutdown advised]"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "    [{}] {} - {}{shutdown}",
                severity_label(finding.severity),
                finding.id,
                finding.summary
            );
            if let Some(rationale) = &finding.rationale {
                let _ = writeln!(out, "        {rationale}");
            }
        }
    }

    if let Some(details) = &result.details
        && !details.flags.disclaimers.is_empty()
    {
        let _ = writeln!(out, "  notes:");
        for disclaimer in &details.flags.disclaimers {
            let _ = writeln!(out, "    - {disclaimer}");
        }
    }
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Critical => "CRITICAL",
        Status::Alert => "ALERT",
        Status::Warning => "warning",
        Status::Ok => "ok",
        Status::Unknown => "unknown",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critical",
        Severity::Alert => "alert",
        Severity::Advisory => "advisory",
        Severity::Info => "info",
    }
}
