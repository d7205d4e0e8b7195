//! Hydronic engine: water-side temperature split, flow versus design, and
//! loop pressure on either circuit of a water-source unit.

use crate::common::{classify_with_margins, finalize_recommendations, severity_for};
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{
    Domain, EngineResult, Flags, Intent, RangeDef, Recommendation, Status, resolve_range,
};
use ft_profile::{EquipmentProfile, HydronicCircuit, HydronicMeasurements, OperatingMode};
use std::collections::BTreeMap;
use tracing::debug;

const LOOP_COOLING: RangeDef = RangeDef {
    min: 9.0,
    ideal: 12.0,
    max: 15.0,
};
const LOOP_HEATING: RangeDef = RangeDef {
    min: 5.0,
    ideal: 8.0,
    max: 11.0,
};
const SOURCE_COOLING: RangeDef = RangeDef {
    min: 8.0,
    ideal: 12.0,
    max: 18.0,
};
const SOURCE_HEATING: RangeDef = RangeDef {
    min: 4.0,
    ideal: 7.0,
    max: 10.0,
};
/// Measured flow as a fraction of design flow.
const FLOW_RATIO: RangeDef = RangeDef {
    min: 0.85,
    ideal: 1.0,
    max: 1.25,
};
/// Rule-of-thumb design water flow when the profile omits it.
const DESIGN_GPM_PER_TON: f64 = 3.0;
/// Static loop pressure below this suggests a flat or air-bound loop.
const MIN_LOOP_PRESSURE_PSIG: f64 = 10.0;

#[derive(Debug, Default)]
pub struct HydronicEngine;

impl HydronicEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticEngine for HydronicEngine {
    type Measurements = HydronicMeasurements;

    fn domain(&self) -> Domain {
        Domain::Hydronic
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.entering_water_temp_f.is_none() {
            issues.push("entering water temperature is required".to_string());
        }
        if m.leaving_water_temp_f.is_none() {
            issues.push("leaving water temperature is required".to_string());
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();
        flags.tag("circuit", circuit_str(m.circuit));
        flags.tag("mode", m.mode.as_str());

        match (m.entering_water_temp_f, m.leaving_water_temp_f) {
            _ if m.mode == OperatingMode::FanOnly => {
                flags.set_status("water_delta_t", Status::Unknown);
                flags.disclaim(
                    "Compressor off in fan-only mode; no water-side temperature split \
                     is expected",
                );
            }
            (Some(ewt), Some(lwt)) => {
                let delta_t = (lwt - ewt).abs();
                values.insert("water_delta_t_f".to_string(), delta_t);

                let industry = match (m.circuit, m.mode) {
                    (HydronicCircuit::Loop, OperatingMode::Heating) => LOOP_HEATING,
                    (HydronicCircuit::Loop, _) => LOOP_COOLING,
                    (HydronicCircuit::Source, OperatingMode::Heating) => SOURCE_HEATING,
                    (HydronicCircuit::Source, _) => SOURCE_COOLING,
                };
                let resolved = resolve_range(
                    "water-side delta-T",
                    profile.expected_ranges.water_delta_t,
                    None,
                    industry,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                let status = classify_with_margins(delta_t, &resolved.range, 3.0, 6.0);
                flags.set_status("water_delta_t", status);
                if status != Status::Ok {
                    flags.tag(
                        "water_delta_t_deviation",
                        if delta_t < resolved.range.ideal { "low" } else { "high" },
                    );
                }
            }
            _ => {
                flags.set_status("water_delta_t", Status::Unknown);
                flags.disclaim(
                    "Water-side delta-T requires entering and leaving water temperatures",
                );
            }
        }

        // Flow versus design. Design flow comes from the profile, or from a
        // 3 gpm/ton rule of thumb when absent.
        match m.water_flow_gpm {
            Some(flow) => {
                values.insert("water_flow_gpm".to_string(), flow);
                let design = match profile.design_water_flow_gpm {
                    Some(design) if design > 0.0 => {
                        flags.tag("flow_design_source", "profile");
                        Some(design)
                    }
                    _ if profile.nominal_tons > 0.0 => {
                        flags.tag("flow_design_source", "estimated");
                        flags.disclaim(format!(
                            "Design water flow not on file; compared against a \
                             {DESIGN_GPM_PER_TON:.0} gpm/ton estimate"
                        ));
                        Some(profile.nominal_tons * DESIGN_GPM_PER_TON)
                    }
                    _ => None,
                };
                match design {
                    Some(design) => {
                        let ratio = flow / design;
                        values.insert("design_water_flow_gpm".to_string(), design);
                        values.insert("flow_ratio".to_string(), ratio);
                        let range = ft_core::ExpectedRange::from_def(
                            FLOW_RATIO,
                            ft_core::RangeSource::Industry,
                        );
                        let status = classify_with_margins(ratio, &range, 0.15, 0.35);
                        flags.set_status("water_flow", status);
                        if status != Status::Ok {
                            flags.tag(
                                "water_flow_deviation",
                                if ratio < range.ideal { "low" } else { "high" },
                            );
                        }
                    }
                    None => {
                        flags.set_status("water_flow", Status::Unknown);
                        flags.disclaim(
                            "No design flow or tonnage available; flow check skipped",
                        );
                    }
                }
            }
            None => {
                flags.set_status("water_flow", Status::Unknown);
                flags.disclaim("Water flow not measured; flow check skipped");
            }
        }

        if let Some(pressure) = m.loop_pressure_psig {
            values.insert("loop_pressure_psig".to_string(), pressure);
            if pressure < MIN_LOOP_PRESSURE_PSIG {
                flags.set_status("loop_pressure", Status::Warning);
            } else {
                flags.set_status("loop_pressure", Status::Ok);
            }
        }

        let recommendations = recommendations(&flags);
        let result = EngineResult::finalize(Domain::Hydronic, values, flags, recommendations);
        debug!(status = %result.status, "hydronic evaluation complete");
        result
    }
}

fn circuit_str(circuit: HydronicCircuit) -> &'static str {
    match circuit {
        HydronicCircuit::Loop => "loop",
        HydronicCircuit::Source => "source",
    }
}

fn recommendations(flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::Hydronic;

    let delta_status = flags.status("water_delta_t");
    if delta_status.is_abnormal() || delta_status == Status::Warning {
        match flags.tag_value("water_delta_t_deviation") {
            Some("high") => recs.push(Recommendation::new(
                "high_water_delta_t",
                domain,
                severity_for(delta_status),
                Intent::Diagnostic,
                "Water-side temperature split is above the expected band; low water \
                 flow or exchanger fouling is suspected",
            )),
            Some("low") => recs.push(Recommendation::new(
                "low_water_delta_t",
                domain,
                severity_for(delta_status),
                Intent::Diagnostic,
                "Water-side temperature split is below the expected band; overpumping \
                 or light refrigerant-side load is suspected",
            )),
            _ => {}
        }
    }

    let flow_status = flags.status("water_flow");
    if flow_status.is_abnormal() || flow_status == Status::Warning {
        match flags.tag_value("water_flow_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_water_flow",
                domain,
                severity_for(flow_status),
                Intent::Diagnostic,
                "Measured water flow is below design; a strainer, valve position, or \
                 circulator issue is suspected",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_water_flow",
                domain,
                severity_for(flow_status),
                Intent::Diagnostic,
                "Measured water flow is above design; balancing against other loads on \
                 the loop may be off",
            )),
            _ => {}
        }
    }

    if flags.status("loop_pressure") == Status::Warning {
        recs.push(Recommendation::new(
            "low_loop_pressure",
            domain,
            severity_for(Status::Warning),
            Intent::Diagnostic,
            "Static loop pressure is low; air entrainment or a slow leak in the water \
             loop is suspected",
        ));
    }

    finalize_recommendations(domain, "hydronic_trend_monitoring", recs)
}
