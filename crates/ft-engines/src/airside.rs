//! Airside engine: coil temperature split and airflow-per-ton, with a
//! static-pressure plausibility gate on technician-entered airflow.

use crate::common::{classify_with_margins, finalize_recommendations, severity_for};
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{
    Domain, EngineResult, Flags, Intent, RangeDef, Recommendation, Status, resolve_range,
};
use ft_profile::{AirsideMeasurements, EquipmentProfile, OperatingMode};
use std::collections::BTreeMap;
use tracing::debug;

const DELTA_T_COOLING: RangeDef = RangeDef {
    min: 16.0,
    ideal: 19.0,
    max: 22.0,
};
const DELTA_T_HEATING: RangeDef = RangeDef {
    min: 20.0,
    ideal: 27.0,
    max: 35.0,
};
/// Fan-only airflow should move air without changing its temperature much.
const DELTA_T_FAN_ONLY: RangeDef = RangeDef {
    min: 0.0,
    ideal: 1.0,
    max: 3.0,
};
const CFM_PER_TON_INDUSTRY: RangeDef = RangeDef {
    min: 350.0,
    ideal: 400.0,
    max: 450.0,
};
/// Fractional tolerance applied around design CFM when deriving a
/// nameplate-calculated airflow band.
const DESIGN_CFM_TOLERANCE: f64 = 0.15;

/// Return-air relative humidity outside this band skews the sensible split
/// enough to flag.
const RH_LOW_PERCENT: f64 = 20.0;
const RH_HIGH_PERCENT: f64 = 60.0;

/// Plausible CFM-per-ton window for a technician-entered airflow, chosen by
/// measured total external static pressure.
fn override_plausibility_band(external_static_in_wc: Option<f64>) -> ((f64, f64), Option<&'static str>) {
    match external_static_in_wc {
        Some(esp) if esp <= 0.5 => ((300.0, 500.0), None),
        Some(esp) if esp <= 0.8 => ((250.0, 550.0), None),
        Some(_) => ((200.0, 600.0), None),
        None => (
            (250.0, 550.0),
            Some(
                "External static pressure not measured; technician airflow gated \
                 against the default plausibility window",
            ),
        ),
    }
}

#[derive(Debug, Default)]
pub struct AirsideEngine;

impl AirsideEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticEngine for AirsideEngine {
    type Measurements = AirsideMeasurements;

    fn domain(&self) -> Domain {
        Domain::Airside
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.return_air_temp_f.is_none() {
            issues.push("return air temperature is required".to_string());
        }
        if m.supply_air_temp_f.is_none() {
            issues.push("supply air temperature is required".to_string());
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();
        flags.tag("mode", m.mode.as_str());

        // Temperature split across the coil, signed by mode so the expected
        // direction of change is part of the check.
        match (m.return_air_temp_f, m.supply_air_temp_f) {
            (Some(return_t), Some(supply_t)) => {
                let delta_t = match m.mode {
                    OperatingMode::Cooling => return_t - supply_t,
                    OperatingMode::Heating => supply_t - return_t,
                    OperatingMode::FanOnly => (supply_t - return_t).abs(),
                };
                values.insert("air_delta_t_f".to_string(), delta_t);

                let industry = match m.mode {
                    OperatingMode::Cooling => DELTA_T_COOLING,
                    OperatingMode::Heating => DELTA_T_HEATING,
                    OperatingMode::FanOnly => DELTA_T_FAN_ONLY,
                };
                let resolved = resolve_range(
                    "air-side delta-T",
                    profile.expected_ranges.air_delta_t,
                    None,
                    industry,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                let status = classify_with_margins(delta_t, &resolved.range, 4.0, 10.0);
                flags.set_status("air_delta_t", status);
                if status != Status::Ok {
                    flags.tag(
                        "air_delta_t_deviation",
                        if delta_t < resolved.range.ideal { "low" } else { "high" },
                    );
                }
            }
            _ => {
                flags.set_status("air_delta_t", Status::Unknown);
                flags.disclaim(
                    "Air-side delta-T requires both return and supply air temperatures",
                );
            }
        }

        // Airflow per ton. A direct measurement always wins; a technician
        // estimate is accepted only inside the static-pressure plausibility
        // window.
        let tons = profile.nominal_tons;
        let design_fallback = |flags: &mut Flags| {
            profile.design_cfm.map(|design| {
                flags.tag("airflow_source", "design_estimate");
                flags.disclaim(
                    "Airflow not measured; design CFM assumed for the airflow-per-ton \
                     check",
                );
                design
            })
        };
        let airflow_cfm = if let Some(cfm) = m.measured_cfm {
            flags.tag("airflow_source", "measured");
            Some(cfm)
        } else if let Some(cfm) = m.technician_cfm_override {
            let ((band_min, band_max), band_disclaimer) =
                override_plausibility_band(m.external_static_in_wc);
            if let Some(text) = band_disclaimer {
                flags.disclaim(text);
            }
            if tons > 0.0 {
                let per_ton = cfm / tons;
                if per_ton < band_min {
                    flags.disclaim(format!(
                        "Technician airflow of {per_ton:.0} CFM/ton is below minimum \
                         plausible at the measured static pressure; entry rejected"
                    ));
                    design_fallback(&mut flags)
                } else if per_ton > band_max {
                    flags.disclaim(format!(
                        "Technician airflow of {per_ton:.0} CFM/ton is above maximum \
                         plausible at the measured static pressure; entry rejected"
                    ));
                    design_fallback(&mut flags)
                } else {
                    flags.tag("airflow_source", "technician_override");
                    flags.disclaim("Airflow is a technician estimate, not a direct measurement");
                    Some(cfm)
                }
            } else {
                None
            }
        } else {
            design_fallback(&mut flags)
        };

        match airflow_cfm {
            Some(cfm) if tons > 0.0 => {
                let per_ton = cfm / tons;
                values.insert("cfm".to_string(), cfm);
                values.insert("cfm_per_ton".to_string(), per_ton);

                let nameplate = profile.design_cfm.map(|design| {
                    let design_per_ton = design / tons;
                    RangeDef {
                        min: design_per_ton * (1.0 - DESIGN_CFM_TOLERANCE),
                        ideal: design_per_ton,
                        max: design_per_ton * (1.0 + DESIGN_CFM_TOLERANCE),
                    }
                });
                let resolved = resolve_range(
                    "airflow per ton",
                    profile.expected_ranges.cfm_per_ton,
                    nameplate,
                    CFM_PER_TON_INDUSTRY,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                flags.tag("airflow_range_source", resolved.range.source.as_str());
                let status = classify_with_margins(per_ton, &resolved.range, 60.0, 120.0);
                flags.set_status("airflow", status);
                if status != Status::Ok {
                    flags.tag(
                        "airflow_deviation",
                        if per_ton < resolved.range.ideal { "low" } else { "high" },
                    );
                }
            }
            _ => {
                flags.set_status("airflow", Status::Unknown);
                if tons <= 0.0 {
                    flags.disclaim("Nominal tonnage missing or invalid; airflow per ton skipped");
                } else {
                    flags.disclaim("No usable airflow reading; airflow per ton skipped");
                }
            }
        }

        // Humidity sanity. High return RH loads the coil latently and
        // shrinks the sensible split.
        if let Some(rh) = m.return_air_rh_percent {
            values.insert("return_air_rh_percent".to_string(), rh);
            if rh > RH_HIGH_PERCENT || rh < RH_LOW_PERCENT {
                flags.set_status("humidity", Status::Warning);
                flags.disclaim(
                    "Return-air humidity is outside the typical band; the sensible \
                     delta-T comparison is less reliable",
                );
            } else {
                flags.set_status("humidity", Status::Ok);
            }
        }

        let recommendations = recommendations(m.mode, &flags);
        let result = EngineResult::finalize(Domain::Airside, values, flags, recommendations);
        debug!(status = %result.status, "airside evaluation complete");
        result
    }
}

fn recommendations(mode: OperatingMode, flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::Airside;

    let delta_status = flags.status("air_delta_t");
    if delta_status.is_abnormal() || delta_status == Status::Warning {
        match flags.tag_value("air_delta_t_deviation") {
            Some("high")
                if mode == OperatingMode::Cooling && delta_status >= Status::Alert =>
            {
                let mut rec = Recommendation::new(
                    "frozen_coil_or_restriction",
                    domain,
                    severity_for(delta_status),
                    if delta_status == Status::Critical {
                        Intent::Safety
                    } else {
                        Intent::Diagnostic
                    },
                    "Cooling temperature split is far above the expected band; a frozen \
                     evaporator coil or severe airflow restriction is suspected",
                );
                if delta_status == Status::Critical {
                    rec = rec.with_shutdown();
                }
                recs.push(rec);
            }
            Some("high") => recs.push(Recommendation::new(
                "high_air_delta_t",
                domain,
                severity_for(delta_status),
                Intent::Diagnostic,
                "Temperature split is above the expected band; low airflow across the \
                 coil is suspected",
            )),
            Some("low") => recs.push(Recommendation::new(
                "low_air_delta_t",
                domain,
                severity_for(delta_status),
                Intent::Diagnostic,
                "Temperature split is below the expected band; reduced capacity or \
                 excess airflow is suspected",
            )),
            _ => {}
        }
    }

    let airflow_status = flags.status("airflow");
    if airflow_status.is_abnormal() || airflow_status == Status::Warning {
        match flags.tag_value("airflow_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_airflow",
                domain,
                severity_for(airflow_status),
                Intent::Diagnostic,
                "Airflow per ton is below the expected band; blower performance or duct \
                 restriction is suspected",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_airflow",
                domain,
                severity_for(airflow_status),
                Intent::Diagnostic,
                "Airflow per ton is above the expected band; check blower tap and duct \
                 configuration assumptions",
            )),
            _ => {}
        }
    }

    if flags.status("humidity") == Status::Warning {
        recs.push(Recommendation::new(
            "return_humidity_out_of_band",
            domain,
            severity_for(Status::Warning),
            Intent::Diagnostic,
            "Return-air humidity is outside the typical band; interpret the sensible \
             temperature split with caution",
        ));
    }

    finalize_recommendations(domain, "airside_trend_monitoring", recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::Severity;
    use ft_profile::{ManufacturerRanges, MeteringDevice};

    fn profile(tons: f64) -> EquipmentProfile {
        EquipmentProfile {
            id: "wshp-1".into(),
            name: None,
            nominal_tons: tons,
            design_cfm: None,
            design_water_flow_gpm: None,
            compressor_rla: None,
            refrigerant: "R-410A".into(),
            metering: MeteringDevice::Txv,
            expected_ranges: ManufacturerRanges::default(),
            pt_override: None,
        }
    }

    fn cooling(return_t: f64, supply_t: f64) -> AirsideMeasurements {
        AirsideMeasurements {
            mode: OperatingMode::Cooling,
            return_air_temp_f: Some(return_t),
            supply_air_temp_f: Some(supply_t),
            ..Default::default()
        }
    }

    #[test]
    fn nominal_cooling_split_is_ok() {
        let result = AirsideEngine::new().evaluate(&cooling(75.0, 56.0), &profile(5.0));
        assert_eq!(result.flags.status("air_delta_t"), Status::Ok);
        assert!((result.value("air_delta_t_f").unwrap() - 19.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_cooling_split_is_critical_with_frozen_coil_recommendation() {
        // 45 °F split in cooling: well past the alert margin.
        let result = AirsideEngine::new().evaluate(&cooling(75.0, 30.0), &profile(5.0));
        assert_eq!(result.flags.status("air_delta_t"), Status::Critical);
        assert_eq!(result.status, Status::Critical);
        let rec = result
            .recommendations
            .iter()
            .find(|r| r.id == "frozen_coil_or_restriction")
            .expect("frozen coil recommendation");
        assert_eq!(rec.severity, Severity::Critical);
        assert!(rec.requires_shutdown);
    }

    #[test]
    fn starved_airflow_per_ton_is_critical() {
        let mut m = cooling(75.0, 56.0);
        m.measured_cfm = Some(600.0); // 120 CFM/ton on a 5-ton unit
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.status("airflow"), Status::Critical);
        assert_eq!(result.flags.tag_value("airflow_deviation"), Some("low"));
        assert!(result.recommendations.iter().any(|r| r.id == "low_airflow"));
    }

    #[test]
    fn implausible_technician_airflow_is_rejected() {
        let mut m = cooling(75.0, 56.0);
        // 200 CFM/ton claimed at low static pressure: below the [300, 500]
        // plausibility window.
        m.technician_cfm_override = Some(1000.0);
        m.external_static_in_wc = Some(0.3);
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));

        assert_ne!(
            result.flags.tag_value("airflow_source"),
            Some("technician_override")
        );
        assert_eq!(result.flags.status("airflow"), Status::Unknown);
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("below minimum"))
        );
        assert!(result.value("cfm_per_ton").is_none());
    }

    #[test]
    fn plausible_technician_airflow_is_accepted_with_disclaimer() {
        let mut m = cooling(75.0, 56.0);
        m.technician_cfm_override = Some(2000.0); // 400 CFM/ton
        m.external_static_in_wc = Some(0.3);
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));

        assert_eq!(
            result.flags.tag_value("airflow_source"),
            Some("technician_override")
        );
        assert_eq!(result.flags.status("airflow"), Status::Ok);
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("technician estimate"))
        );
    }

    #[test]
    fn missing_static_pressure_widens_nothing_but_discloses() {
        let mut m = cooling(75.0, 56.0);
        m.technician_cfm_override = Some(2000.0);
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("static pressure not measured"))
        );
    }

    #[test]
    fn measured_cfm_wins_over_override() {
        let mut m = cooling(75.0, 56.0);
        m.measured_cfm = Some(2000.0);
        m.technician_cfm_override = Some(600.0);
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.tag_value("airflow_source"), Some("measured"));
        assert!((result.value("cfm_per_ton").unwrap() - 400.0).abs() < 1e-9);
    }

    #[test]
    fn rejected_override_falls_back_to_design_cfm() {
        let mut m = cooling(75.0, 56.0);
        m.technician_cfm_override = Some(1000.0); // 200 CFM/ton, rejected
        m.external_static_in_wc = Some(0.3);
        let mut p = profile(5.0);
        p.design_cfm = Some(2000.0);
        let result = AirsideEngine::new().evaluate(&m, &p);

        assert_eq!(
            result.flags.tag_value("airflow_source"),
            Some("design_estimate")
        );
        assert!((result.value("cfm").unwrap() - 2000.0).abs() < 1e-9);
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("below minimum"))
        );
    }

    #[test]
    fn design_cfm_produces_nameplate_band() {
        let mut m = cooling(75.0, 56.0);
        m.measured_cfm = Some(1750.0);
        let mut p = profile(5.0);
        p.design_cfm = Some(1750.0);
        let result = AirsideEngine::new().evaluate(&m, &p);
        assert_eq!(
            result.flags.tag_value("airflow_range_source"),
            Some("nameplate_calculated")
        );
        assert_eq!(result.flags.status("airflow"), Status::Ok);
    }

    #[test]
    fn heating_mode_uses_its_own_band() {
        let m = AirsideMeasurements {
            mode: OperatingMode::Heating,
            return_air_temp_f: Some(70.0),
            supply_air_temp_f: Some(97.0),
            ..Default::default()
        };
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.status("air_delta_t"), Status::Ok);
        assert!((result.value("air_delta_t_f").unwrap() - 27.0).abs() < 1e-9);
    }

    #[test]
    fn fan_only_split_should_be_near_zero() {
        let m = AirsideMeasurements {
            mode: OperatingMode::FanOnly,
            return_air_temp_f: Some(72.0),
            supply_air_temp_f: Some(72.5),
            ..Default::default()
        };
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.status("air_delta_t"), Status::Ok);
    }

    #[test]
    fn high_return_humidity_warns() {
        let mut m = cooling(75.0, 58.0);
        m.return_air_rh_percent = Some(72.0);
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.status("humidity"), Status::Warning);
        assert!(
            result
                .recommendations
                .iter()
                .any(|r| r.id == "return_humidity_out_of_band")
        );
    }

    #[test]
    fn missing_temperatures_degrade_to_unknown() {
        let m = AirsideMeasurements {
            mode: OperatingMode::Cooling,
            measured_cfm: Some(2000.0),
            ..Default::default()
        };
        let result = AirsideEngine::new().evaluate(&m, &profile(5.0));
        assert_eq!(result.flags.status("air_delta_t"), Status::Unknown);
        // Airflow still classifies on its own.
        assert_eq!(result.flags.status("airflow"), Status::Ok);
        assert!(!result.recommendations.is_empty());
    }
}
