//! ft-orchestrator: engine selection, aggregation, and cross-domain
//! correlation.
//!
//! The orchestrator owns the run shape: pre-validate, run each engine whose
//! measurement group is present and unblocked, aggregate worst-of, then
//! apply the correlation-rule table over the finalized results. It never
//! reinterprets raw measurements itself.

pub mod correlate;
pub mod report;

pub use report::{DomainResult, EvaluationReport, SkipReason, SkippedDomain};

use chrono::Utc;
use ft_core::{Domain, Status};
use ft_engines::{
    AirsideEngine, CondenserApproachEngine, DiagnosticEngine, HydronicEngine,
    ReciprocatingCompressorEngine, ReversingValveEngine, RefrigerationEngine,
    ScrollCompressorEngine,
};
use ft_profile::{FieldCase, blocked_domains, prevalidate};
use ft_refrigerants::{Refrigerant, SaturationCurve, SaturationLookup};
use tracing::{debug, info};
use uuid::Uuid;

pub struct Orchestrator {
    lookup: SaturationLookup,
    /// PT table from the override store, forwarded to the saturation-based
    /// engines only when the profile's refrigerant is unrecognized.
    stored_pt_override: Option<SaturationCurve>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            lookup: SaturationLookup::builtin(),
            stored_pt_override: None,
        }
    }

    pub fn with_stored_pt_override(mut self, curve: Option<SaturationCurve>) -> Self {
        self.stored_pt_override = curve;
        self
    }

    pub fn run(&self, case: &FieldCase) -> EvaluationReport {
        let profile = &case.profile;
        info!(profile_id = %profile.id, "starting evaluation");

        let validation = prevalidate(case);
        let blocked = blocked_domains(&validation);

        // Stored overrides are only meaningful for unrecognized refrigerants;
        // named refrigerants always evaluate against their built-in curve.
        let stored_override = if Refrigerant::parse(&profile.refrigerant).is_known() {
            None
        } else {
            self.stored_pt_override.clone()
        };

        let mut domain_results = Vec::new();
        let mut skipped = Vec::new();
        let bundle = &case.measurements;

        let mut dispatch = |domain: Domain, run: &mut dyn FnMut() -> Option<DomainResult>| {
            if blocked.contains(&domain) {
                skipped.push(SkippedDomain {
                    domain,
                    reason: SkipReason::ValidationBlocked,
                });
                return;
            }
            match run() {
                Some(result) => {
                    debug!(domain = %domain, status = %result.status(), "engine finished");
                    domain_results.push(result);
                }
                None => skipped.push(SkippedDomain {
                    domain,
                    reason: SkipReason::NoMeasurements,
                }),
            }
        };

        dispatch(Domain::Refrigeration, &mut || {
            bundle
                .refrigeration
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| {
                    let engine = RefrigerationEngine::new(self.lookup.clone())
                        .with_manual_override(stored_override.clone());
                    DomainResult::from_engine(engine.evaluate(m, profile))
                })
        });
        dispatch(Domain::Airside, &mut || {
            bundle
                .airside
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| DomainResult::from_engine(AirsideEngine::new().evaluate(m, profile)))
        });
        dispatch(Domain::Hydronic, &mut || {
            bundle
                .hydronic
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| DomainResult::from_engine(HydronicEngine::new().evaluate(m, profile)))
        });
        dispatch(Domain::CondenserApproach, &mut || {
            bundle.condenser.as_ref().filter(|m| !m.is_empty()).map(|m| {
                let engine = CondenserApproachEngine::new(self.lookup.clone())
                    .with_manual_override(stored_override.clone());
                DomainResult::from_engine(engine.evaluate(m, profile))
            })
        });
        dispatch(Domain::ReciprocatingCompressor, &mut || {
            bundle
                .reciprocating_compressor
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| {
                    DomainResult::from_engine(
                        ReciprocatingCompressorEngine::new().evaluate(m, profile),
                    )
                })
        });
        dispatch(Domain::ScrollCompressor, &mut || {
            bundle
                .scroll_compressor
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| {
                    DomainResult::from_engine(ScrollCompressorEngine::new().evaluate(m, profile))
                })
        });
        dispatch(Domain::ReversingValve, &mut || {
            bundle
                .reversing_valve
                .as_ref()
                .filter(|m| !m.is_empty())
                .map(|m| {
                    DomainResult::from_engine(ReversingValveEngine::new().evaluate(m, profile))
                })
        });

        let findings = correlate::correlate(&domain_results);
        if !findings.is_empty() {
            domain_results.push(DomainResult::controls(findings));
        }

        let overall_status = domain_results
            .iter()
            .map(DomainResult::status)
            .fold(Status::Unknown, Status::max);

        info!(
            profile_id = %profile.id,
            overall = %overall_status,
            domains = domain_results.len(),
            skipped = skipped.len(),
            "evaluation complete"
        );

        EvaluationReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile_id: profile.id.clone(),
            validation,
            skipped_domains: skipped,
            domain_results,
            overall_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_profile::{
        AirsideMeasurements, EquipmentProfile, ManufacturerRanges, MeasurementBundle,
        MeteringDevice, OperatingMode, RefrigerationMeasurements,
    };

    fn case() -> FieldCase {
        FieldCase {
            version: 1,
            profile: EquipmentProfile {
                id: "wshp-7".into(),
                name: Some("Roof unit 7".into()),
                nominal_tons: 5.0,
                design_cfm: None,
                design_water_flow_gpm: None,
                compressor_rla: Some(24.0),
                refrigerant: "R-410A".into(),
                metering: MeteringDevice::Txv,
                expected_ranges: ManufacturerRanges::default(),
                pt_override: None,
            },
            measurements: MeasurementBundle::default(),
        }
    }

    #[test]
    fn empty_bundle_runs_nothing() {
        let report = Orchestrator::new().run(&case());
        assert!(report.domain_results.is_empty());
        assert_eq!(report.skipped_domains.len(), 7);
        assert!(
            report
                .skipped_domains
                .iter()
                .all(|s| s.reason == SkipReason::NoMeasurements)
        );
        assert_eq!(report.overall_status, Status::Unknown);
    }

    #[test]
    fn validation_error_blocks_only_the_affected_domain() {
        let mut case = case();
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(-5.0),
            discharge_pressure_psig: Some(300.0),
            suction_line_temp_f: Some(55.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });
        case.measurements.airside = Some(AirsideMeasurements {
            mode: OperatingMode::Cooling,
            return_air_temp_f: Some(75.0),
            supply_air_temp_f: Some(56.0),
            ..Default::default()
        });

        let report = Orchestrator::new().run(&case);
        assert!(report.domain(Domain::Refrigeration).is_none());
        assert!(report.skipped_domains.iter().any(|s| {
            s.domain == Domain::Refrigeration && s.reason == SkipReason::ValidationBlocked
        }));
        assert!(report.domain(Domain::Airside).is_some());
        assert!(!report.validation.is_empty());
    }

    #[test]
    fn concurrent_airside_and_superheat_criticals_produce_controls_findings() {
        let mut case = case();
        // Frozen-coil split and liquid at the compressor inlet.
        case.measurements.airside = Some(AirsideMeasurements {
            mode: OperatingMode::Cooling,
            return_air_temp_f: Some(75.0),
            supply_air_temp_f: Some(30.0),
            ..Default::default()
        });
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(120.0),
            discharge_pressure_psig: Some(300.0),
            suction_line_temp_f: Some(30.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });

        let report = Orchestrator::new().run(&case);
        let controls = report.domain(Domain::Controls).expect("controls entry");
        assert!(
            controls
                .findings
                .iter()
                .any(|f| f.severity == ft_core::Severity::Critical)
        );
        assert_eq!(report.overall_status, Status::Critical);
    }

    #[test]
    fn overall_status_is_worst_of_domain_results() {
        let mut case = case();
        case.measurements.airside = Some(AirsideMeasurements {
            mode: OperatingMode::Cooling,
            return_air_temp_f: Some(75.0),
            supply_air_temp_f: Some(56.0),
            ..Default::default()
        });
        let report = Orchestrator::new().run(&case);
        let worst = report
            .domain_results
            .iter()
            .map(DomainResult::status)
            .fold(Status::Unknown, Status::max);
        assert_eq!(report.overall_status, worst);
    }

    #[test]
    fn stored_override_is_withheld_for_named_refrigerants() {
        let mut case = case();
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(120.0),
            discharge_pressure_psig: Some(300.0),
            suction_line_temp_f: Some(55.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });
        let curve = SaturationCurve::new(vec![(0.0, 50.0), (100.0, 400.0)]);
        let report = Orchestrator::new()
            .with_stored_pt_override(Some(curve))
            .run(&case);

        let refrigeration = report.domain(Domain::Refrigeration).unwrap();
        let details = refrigeration.details.as_ref().unwrap();
        assert_eq!(details.flags.tag_value("saturation_source"), Some("builtin"));
        // Withheld upstream, so not even an "ignored" disclaimer appears.
        assert!(
            !details
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("ignored"))
        );
    }
}
