//! Reciprocating compressor engine: compression ratio, motor current,
//! cylinder unloading, and valve-condition heuristics.

use crate::common::{
    classify_compression_ratio, classify_motor_current, finalize_recommendations, psia,
    severity_for,
};
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{
    Domain, EngineResult, Flags, Intent, RangeDef, Recommendation, Severity, Status,
    resolve_range,
};
use ft_profile::{CompressorMeasurements, EquipmentProfile};
use std::collections::BTreeMap;
use tracing::debug;

const COMPRESSION_RATIO_INDUSTRY: RangeDef = RangeDef {
    min: 2.0,
    ideal: 3.0,
    max: 4.5,
};
/// More than half the cylinders unloaded for a steady-state reading points
/// at a control or capacity problem.
const MAX_UNLOADED_FRACTION: f64 = 0.5;

#[derive(Debug, Default)]
pub struct ReciprocatingCompressorEngine;

impl ReciprocatingCompressorEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticEngine for ReciprocatingCompressorEngine {
    type Measurements = CompressorMeasurements;

    fn domain(&self) -> Domain {
        Domain::ReciprocatingCompressor
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.suction_pressure_psig.is_none() || m.discharge_pressure_psig.is_none() {
            issues.push("both circuit pressures are required".to_string());
        }
        if let (Some(total), Some(unloaded)) = (m.cylinders_total, m.cylinders_unloaded)
            && unloaded > total
        {
            issues.push("unloaded cylinder count exceeds total".to_string());
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();
        let mut recs = Vec::new();

        match (m.suction_pressure_psig, m.discharge_pressure_psig) {
            (Some(suction_p), Some(discharge_p)) if psia(suction_p) > 0.0 => {
                let ratio = psia(discharge_p) / psia(suction_p);
                values.insert("compression_ratio".to_string(), ratio);
                let resolved = resolve_range(
                    "compression ratio",
                    profile.expected_ranges.compression_ratio,
                    None,
                    COMPRESSION_RATIO_INDUSTRY,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                let status = classify_compression_ratio(ratio, &resolved.range);
                flags.set_status("compression_ratio", status);
                if status != Status::Ok {
                    flags.tag(
                        "compression_ratio_deviation",
                        if ratio < resolved.range.ideal { "low" } else { "high" },
                    );
                }
            }
            _ => {
                flags.set_status("compression_ratio", Status::Unknown);
                flags.disclaim("Compression ratio requires both circuit pressures");
            }
        }

        if let Some(pct) = classify_motor_current(
            Domain::ReciprocatingCompressor,
            m.compressor_amps,
            profile.compressor_rla,
            &mut flags,
            &mut recs,
        ) {
            values.insert("motor_current_pct".to_string(), pct);
        }

        // Cylinder unloading fraction, where the head configuration is known.
        if let (Some(total), Some(unloaded)) = (m.cylinders_total, m.cylinders_unloaded) {
            if total > 0 && unloaded <= total {
                let fraction = f64::from(unloaded) / f64::from(total);
                values.insert("unloaded_fraction".to_string(), fraction);
                if fraction > MAX_UNLOADED_FRACTION {
                    flags.set_status("unloading", Status::Warning);
                } else {
                    flags.set_status("unloading", Status::Ok);
                }
            } else {
                flags.set_status("unloading", Status::Unknown);
                flags.disclaim("Cylinder counts are inconsistent; unloading check skipped");
            }
        }

        // Audible hissing plus an abnormal ratio is the classic discharge
        // valve leak signature.
        let ratio_status = flags.status("compression_ratio");
        if m.audible_hissing == Some(true)
            && (ratio_status.is_abnormal() || ratio_status == Status::Warning)
        {
            flags.set_status("valves", Status::Alert);
        }
        if m.excessive_vibration == Some(true) {
            flags.set_status("vibration", Status::Warning);
        }

        recs.extend(recommendations(&values, &flags));
        let recommendations = finalize_recommendations(
            Domain::ReciprocatingCompressor,
            "reciprocating_trend_monitoring",
            recs,
        );
        let result = EngineResult::finalize(
            Domain::ReciprocatingCompressor,
            values,
            flags,
            recommendations,
        );
        debug!(status = %result.status, "reciprocating compressor evaluation complete");
        result
    }
}

fn recommendations(values: &BTreeMap<String, f64>, flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::ReciprocatingCompressor;

    let ratio_status = flags.status("compression_ratio");
    let ratio = values.get("compression_ratio").copied();
    if ratio_status == Status::Critical && ratio.is_some_and(|r| r < 1.2) {
        recs.push(Recommendation::new(
            "compression_loss",
            domain,
            Severity::Critical,
            Intent::Diagnostic,
            "Compression ratio is near unity; the compressor is moving almost no gas \
             and broken valves or an internal bypass is suspected",
        ));
    } else if ratio_status.is_abnormal() || ratio_status == Status::Warning {
        match flags.tag_value("compression_ratio_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_compression_ratio",
                domain,
                severity_for(ratio_status),
                Intent::Diagnostic,
                "Compression ratio is below the expected band; valve sealing or an \
                 internal relief bypass is suspected",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_compression_ratio",
                domain,
                severity_for(ratio_status),
                Intent::Diagnostic,
                "Compression ratio is above the expected band; high head pressure or a \
                 starved suction side is suspected",
            )),
            _ => {}
        }
    }

    if flags.status("unloading") == Status::Warning {
        recs.push(Recommendation::new(
            "excessive_unloading",
            domain,
            Severity::Advisory,
            Intent::Diagnostic,
            "More than half the cylinders were unloaded during the reading; capacity \
             control behavior deserves a closer look",
        ));
    }

    if flags.status("valves") == Status::Alert {
        recs.push(Recommendation::new(
            "suspected_valve_leakage",
            domain,
            Severity::Alert,
            Intent::Diagnostic,
            "Audible hissing combined with an abnormal compression ratio matches a \
             leaking discharge valve signature",
        ));
    }

    if flags.status("vibration") == Status::Warning {
        recs.push(Recommendation::new(
            "excessive_vibration",
            domain,
            Severity::Advisory,
            Intent::Diagnostic,
            "Excessive vibration was noted; mounting and internal wear are worth \
             monitoring before it progresses",
        ));
    }

    recs
}
