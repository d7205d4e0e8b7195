//! Cross-domain correlation rules.
//!
//! Rules read finalized per-domain flags and never re-derive physics. The
//! table is fixed and ordered; findings land on the synthetic `Controls`
//! domain and the originating results are never touched.

use crate::report::DomainResult;
use ft_core::{Domain, Flags, Intent, Recommendation, Severity, Status};
use tracing::debug;

/// Apply every rule in table order and return the correlation findings.
pub fn correlate(results: &[DomainResult]) -> Vec<Recommendation> {
    let mut findings = Vec::new();
    for rule in RULES {
        if let Some(finding) = (rule.apply)(results) {
            debug!(rule = rule.name, finding = %finding.id, "correlation rule fired");
            findings.push(finding);
        }
    }
    findings
}

struct Rule {
    name: &'static str,
    apply: fn(&[DomainResult]) -> Option<Recommendation>,
}

const RULES: &[Rule] = &[
    Rule {
        name: "airside_gates_refrigerant_diagnosis",
        apply: airside_gates_refrigerant_diagnosis,
    },
    Rule {
        name: "superheat_critical_liquid_slug",
        apply: superheat_critical_liquid_slug,
    },
    Rule {
        name: "concurrent_electrical_critical",
        apply: concurrent_electrical_critical,
    },
    Rule {
        name: "valve_position_needs_mode_check",
        apply: valve_position_needs_mode_check,
    },
];

fn flags_for(results: &[DomainResult], domain: Domain) -> Option<&Flags> {
    results
        .iter()
        .find(|r| r.domain == domain)
        .and_then(|r| r.details.as_ref())
        .map(|d| &d.flags)
}

/// Critical airflow or delta-T makes every refrigerant-side number suspect:
/// superheat, subcooling and head pressure all shift with a starved coil.
fn airside_gates_refrigerant_diagnosis(results: &[DomainResult]) -> Option<Recommendation> {
    let airside = flags_for(results, Domain::Airside)?;
    let airside_critical = airside.status("air_delta_t") == Status::Critical
        || airside.status("airflow") == Status::Critical;
    if !airside_critical {
        return None;
    }
    let has_refrigerant_side = results.iter().any(|r| {
        matches!(
            r.domain,
            Domain::Refrigeration
                | Domain::ReciprocatingCompressor
                | Domain::ScrollCompressor
                | Domain::CondenserApproach
        )
    });
    if !has_refrigerant_side {
        return None;
    }
    Some(Recommendation::new(
        "verify_airflow_before_refrigerant_diagnosis",
        Domain::Controls,
        Severity::Alert,
        Intent::Routing,
        "Airside readings are critically abnormal; treat refrigerant-side findings \
         as provisional until airflow is restored and the circuit re-measured",
    ))
}

/// A Critical superheat classification escalates to a unit-level safety
/// finding, independent of whatever the refrigeration engine recommended.
fn superheat_critical_liquid_slug(results: &[DomainResult]) -> Option<Recommendation> {
    let refrigeration = flags_for(results, Domain::Refrigeration)?;
    if refrigeration.status("superheat") != Status::Critical {
        return None;
    }
    Some(
        Recommendation::new(
            "liquid_slug_risk_unit_level",
            Domain::Controls,
            Severity::Critical,
            Intent::Safety,
            "Superheat is critically abnormal for the whole unit; liquid refrigerant \
             reaching the compressor endangers it regardless of other findings",
        )
        .with_shutdown(),
    )
}

/// Critical motor current alongside another domain's critical status points
/// past the compressor itself to the electrical supply or controls.
fn concurrent_electrical_critical(results: &[DomainResult]) -> Option<Recommendation> {
    let current_critical = [Domain::ReciprocatingCompressor, Domain::ScrollCompressor]
        .into_iter()
        .filter_map(|d| flags_for(results, d))
        .any(|flags| flags.status("motor_current") == Status::Critical);
    if !current_critical {
        return None;
    }
    let other_critical = results.iter().any(|r| {
        !matches!(
            r.domain,
            Domain::ReciprocatingCompressor | Domain::ScrollCompressor
        ) && r.status() == Status::Critical
    });
    if !other_critical {
        return None;
    }
    Some(Recommendation::new(
        "electrical_safety_review",
        Domain::Controls,
        Severity::Critical,
        Intent::Safety,
        "Critical compressor current is concurrent with a critical condition in \
         another domain; an electrical-supply or protection issue may underlie both",
    ))
}

/// A stuck or reversed valve pattern deserves a control-signal check before
/// anyone condemns the valve.
fn valve_position_needs_mode_check(results: &[DomainResult]) -> Option<Recommendation> {
    let valve = flags_for(results, Domain::ReversingValve)?;
    let suspect = valve.status("port_spread") == Status::Critical
        || matches!(valve.tag_value("pattern_match"), Some("stuck") | Some("reversed"));
    if !suspect {
        return None;
    }
    Some(Recommendation::new(
        "verify_mode_command",
        Domain::Controls,
        Severity::Alert,
        Intent::Routing,
        "Reversing valve position disagrees with the commanded mode; confirm the \
         thermostat call and solenoid signal before attributing it to the valve",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::EngineResult;
    use std::collections::BTreeMap;

    fn result_with(domain: Domain, set: &[(&str, Status)]) -> DomainResult {
        let mut flags = Flags::new();
        for (check, status) in set {
            flags.set_status(*check, *status);
        }
        DomainResult::from_engine(EngineResult::finalize(
            domain,
            BTreeMap::new(),
            flags,
            vec![],
        ))
    }

    #[test]
    fn airside_rule_needs_a_refrigerant_side_result() {
        let airside_only = vec![result_with(
            Domain::Airside,
            &[("air_delta_t", Status::Critical)],
        )];
        assert!(correlate(&airside_only).is_empty());

        let with_refrigeration = vec![
            result_with(Domain::Airside, &[("air_delta_t", Status::Critical)]),
            result_with(Domain::Refrigeration, &[("superheat", Status::Ok)]),
        ];
        let findings = correlate(&with_refrigeration);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "verify_airflow_before_refrigerant_diagnosis");
        assert_eq!(findings[0].intent, Intent::Routing);
    }

    #[test]
    fn critical_superheat_escalates_to_safety_finding() {
        let results = vec![result_with(
            Domain::Refrigeration,
            &[("superheat", Status::Critical)],
        )];
        let findings = correlate(&results);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].requires_shutdown);
    }

    #[test]
    fn electrical_rule_needs_two_concurrent_criticals() {
        let current_only = vec![result_with(
            Domain::ScrollCompressor,
            &[("motor_current", Status::Critical)],
        )];
        assert!(correlate(&current_only).is_empty());

        let concurrent = vec![
            result_with(Domain::ScrollCompressor, &[("motor_current", Status::Critical)]),
            result_with(Domain::Hydronic, &[("water_delta_t", Status::Critical)]),
        ];
        let ids: Vec<_> = correlate(&concurrent).into_iter().map(|f| f.id).collect();
        assert!(ids.contains(&"electrical_safety_review".to_string()));
    }

    #[test]
    fn rules_fire_in_table_order() {
        let results = vec![
            result_with(Domain::Airside, &[("airflow", Status::Critical)]),
            result_with(Domain::Refrigeration, &[("superheat", Status::Critical)]),
        ];
        let findings = correlate(&results);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].id, "verify_airflow_before_refrigerant_diagnosis");
        assert_eq!(findings[1].id, "liquid_slug_risk_unit_level");
    }

    #[test]
    fn every_finding_passes_schema_validation() {
        let results = vec![
            result_with(Domain::Airside, &[("airflow", Status::Critical)]),
            result_with(Domain::Refrigeration, &[("superheat", Status::Critical)]),
            result_with(Domain::ScrollCompressor, &[("motor_current", Status::Critical)]),
            result_with(Domain::ReversingValve, &[("port_spread", Status::Critical)]),
        ];
        for finding in correlate(&results) {
            finding.validate().unwrap();
        }
    }
}
