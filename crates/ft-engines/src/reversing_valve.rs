//! Reversing valve engine: port temperature spread and hot-port pattern
//! matching against the commanded mode.

use crate::common::finalize_recommendations;
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{Domain, EngineResult, Flags, Intent, Recommendation, Severity, Status};
use ft_profile::{EquipmentProfile, OperatingMode, ReversingValveMeasurements};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Minimum spread across the measured port temperatures for a valve that
/// is actually routing hot gas. Anything tighter means the ports are mixing.
const MIN_PORT_SPREAD_F: f64 = 50.0;
/// A line at or above this is carrying hot gas.
const HOT_LINE_THRESHOLD_F: f64 = 120.0;

#[derive(Debug, Default)]
pub struct ReversingValveEngine;

impl ReversingValveEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticEngine for ReversingValveEngine {
    type Measurements = ReversingValveMeasurements;

    fn domain(&self) -> Domain {
        Domain::ReversingValve
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.discharge_line_temp_f.is_none() || m.suction_line_temp_f.is_none() {
            issues.push("discharge and suction line temperatures are required".to_string());
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, _profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();
        flags.tag("mode", m.mode.as_str());

        // With the compressor off there is no spread to collapse and no
        // pattern to match.
        if m.mode == OperatingMode::FanOnly {
            flags.set_status("port_spread", Status::Unknown);
            flags.set_status("pattern", Status::Unknown);
            flags.disclaim(
                "No expected hot-port pattern exists in fan-only mode; run the unit in \
                 cooling or heating to test the valve position",
            );
            let recommendations = recommendations(&flags);
            let result =
                EngineResult::finalize(Domain::ReversingValve, values, flags, recommendations);
            debug!(status = %result.status, "reversing valve evaluation complete");
            return result;
        }

        // Port spread comes first: all measured ports reading close together
        // means the valve is mixing hot gas straight into suction, and no
        // pattern reasoning applies after that.
        let stuck = match (m.discharge_line_temp_f, m.suction_line_temp_f) {
            (Some(_), Some(_)) => {
                let measured: Vec<f64> = [
                    m.discharge_line_temp_f,
                    m.suction_line_temp_f,
                    m.indoor_coil_line_temp_f,
                    m.outdoor_coil_line_temp_f,
                ]
                .into_iter()
                .flatten()
                .collect();
                let hottest = measured.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let coldest = measured.iter().copied().fold(f64::INFINITY, f64::min);
                let spread = hottest - coldest;
                values.insert("port_spread_f".to_string(), spread);
                if spread < MIN_PORT_SPREAD_F {
                    flags.set_status("port_spread", Status::Critical);
                    true
                } else {
                    flags.set_status("port_spread", Status::Ok);
                    false
                }
            }
            _ => {
                flags.set_status("port_spread", Status::Unknown);
                flags.disclaim(
                    "Port spread requires discharge and suction line temperatures",
                );
                false
            }
        };

        if stuck {
            flags.tag("pattern_match", "stuck");
            flags.set_status("pattern", Status::Critical);
        } else {
            match (
                m.discharge_line_temp_f,
                m.suction_line_temp_f,
                m.indoor_coil_line_temp_f,
                m.outdoor_coil_line_temp_f,
            ) {
                (Some(discharge_t), Some(suction_t), Some(indoor_t), Some(outdoor_t)) => {
                    let ports = [
                        ("discharge", discharge_t),
                        ("suction", suction_t),
                        ("indoor", indoor_t),
                        ("outdoor", outdoor_t),
                    ];
                    let hot: BTreeSet<&str> = ports
                        .iter()
                        .filter(|(_, t)| *t >= HOT_LINE_THRESHOLD_F)
                        .map(|(name, _)| *name)
                        .collect();
                    // Cooling sends hot gas to the outdoor (source) coil,
                    // heating to the indoor coil; discharge is hot either way.
                    let expected: BTreeSet<&str> = match m.mode {
                        OperatingMode::Cooling => ["discharge", "outdoor"].into(),
                        _ => ["discharge", "indoor"].into(),
                    };
                    let opposite: BTreeSet<&str> = match m.mode {
                        OperatingMode::Cooling => ["discharge", "indoor"].into(),
                        _ => ["discharge", "outdoor"].into(),
                    };
                    let pattern = if hot == expected {
                        flags.set_status("pattern", Status::Ok);
                        "correct"
                    } else if hot == opposite {
                        flags.set_status("pattern", Status::Alert);
                        "reversed"
                    } else {
                        flags.set_status("pattern", Status::Alert);
                        "partial_leak"
                    };
                    flags.tag("pattern_match", pattern);
                }
                _ => {
                    flags.set_status("pattern", Status::Unknown);
                    flags.disclaim("Hot-port pattern requires all four port temperatures");
                }
            }
        }

        let recommendations = recommendations(&flags);
        let result =
            EngineResult::finalize(Domain::ReversingValve, values, flags, recommendations);
        debug!(status = %result.status, "reversing valve evaluation complete");
        result
    }
}

fn recommendations(flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::ReversingValve;

    if flags.status("port_spread") == Status::Critical {
        recs.push(
            Recommendation::new(
                "stuck_or_bypassing_valve",
                domain,
                Severity::Critical,
                Intent::Safety,
                "Port temperature spread has collapsed; the reversing valve is \
                 stuck mid-stroke or bypassing hot gas internally",
            )
            .with_rationale(
                "Hot gas shunted straight to suction overheats the compressor while \
                 delivering no capacity",
            )
            .with_shutdown(),
        );
    }

    match flags.tag_value("pattern_match") {
        Some("reversed") => recs.push(Recommendation::new(
            "valve_position_reversed",
            domain,
            Severity::Alert,
            Intent::Diagnostic,
            "Hot-port pattern is the exact opposite of the commanded mode; the valve \
             solenoid wiring or pilot signal is suspect",
        )),
        Some("partial_leak") => recs.push(Recommendation::new(
            "suspected_partial_leak",
            domain,
            Severity::Alert,
            Intent::Diagnostic,
            "Coil line temperatures match neither the commanded mode nor its reverse; \
             a partially shifted or internally leaking valve is suspected",
        )),
        _ => {}
    }

    finalize_recommendations(domain, "reversing_valve_trend_monitoring", recs)
}
