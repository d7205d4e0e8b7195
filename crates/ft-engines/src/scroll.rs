//! Scroll compressor engine: compression ratio, motor current, and the
//! discharge-temperature ladder that guards scroll tip integrity.

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

/// Discharge line temperature ladder, °F. Oil breakdown starts in the
/// mid-200s, so the ladder is absolute rather than range-relative.
const DISCHARGE_TEMP_WARNING_F: f64 = 200.0;
const DISCHARGE_TEMP_ALERT_F: f64 = 225.0;
const DISCHARGE_TEMP_CRITICAL_F: f64 = 250.0;

#[derive(Debug, Default)]
pub struct ScrollCompressorEngine;

impl ScrollCompressorEngine {
    pub fn new() -> Self {
        Self
    }
}

fn classify_discharge_temp(temp_f: f64) -> Status {
    if !temp_f.is_finite() {
        Status::Unknown
    } else if temp_f < DISCHARGE_TEMP_WARNING_F {
        Status::Ok
    } else if temp_f < DISCHARGE_TEMP_ALERT_F {
        Status::Warning
    } else if temp_f < DISCHARGE_TEMP_CRITICAL_F {
        Status::Alert
    } else {
        Status::Critical
    }
}

impl DiagnosticEngine for ScrollCompressorEngine {
    type Measurements = CompressorMeasurements;

    fn domain(&self) -> Domain {
        Domain::ScrollCompressor
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.suction_pressure_psig.is_none() || m.discharge_pressure_psig.is_none() {
            issues.push("both circuit pressures are required".to_string());
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
            Domain::ScrollCompressor,
            m.compressor_amps,
            profile.compressor_rla,
            &mut flags,
            &mut recs,
        ) {
            values.insert("motor_current_pct".to_string(), pct);
        }

        if let Some(discharge_t) = m.discharge_line_temp_f {
            values.insert("discharge_line_temp_f".to_string(), discharge_t);
            flags.set_status("discharge_temp", classify_discharge_temp(discharge_t));
        }

        if m.excessive_vibration == Some(true) {
            flags.set_status("vibration", Status::Warning);
        }

        recs.extend(recommendations(&values, &flags));
        let recommendations = finalize_recommendations(
            Domain::ScrollCompressor,
            "scroll_trend_monitoring",
            recs,
        );
        let result =
            EngineResult::finalize(Domain::ScrollCompressor, values, flags, recommendations);
        debug!(status = %result.status, "scroll compressor evaluation complete");
        result
    }
}

fn recommendations(values: &BTreeMap<String, f64>, flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::ScrollCompressor;

    let ratio_status = flags.status("compression_ratio");
    let ratio = values.get("compression_ratio").copied();
    if ratio_status == Status::Critical && ratio.is_some_and(|r| r < 1.2) {
        recs.push(Recommendation::new(
            "compression_loss",
            domain,
            Severity::Critical,
            Intent::Diagnostic,
            "Compression ratio is near unity; the scroll set is not sealing and \
             internal bypass is suspected",
        ));
    } else if ratio_status.is_abnormal() || ratio_status == Status::Warning {
        match flags.tag_value("compression_ratio_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_compression_ratio",
                domain,
                severity_for(ratio_status),
                Intent::Diagnostic,
                "Compression ratio is below the expected band; scroll tip wear or an \
                 open internal relief is suspected",
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

    let discharge_status = flags.status("discharge_temp");
    if discharge_status.is_abnormal() || discharge_status == Status::Warning {
        let mut rec = Recommendation::new(
            "high_discharge_temperature",
            domain,
            severity_for(discharge_status),
            if discharge_status == Status::Critical {
                Intent::Safety
            } else {
                Intent::Diagnostic
            },
            "Discharge line temperature is elevated; overheating degrades oil and \
             scroll tips quickly at these levels",
        );
        if discharge_status == Status::Critical {
            rec = rec.with_shutdown();
        }
        recs.push(rec);
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

#[cfg(test)]
mod tests {
    use super::*;
    use ft_profile::{ManufacturerRanges, MeteringDevice};

    fn profile(rla: Option<f64>) -> EquipmentProfile {
        EquipmentProfile {
            id: "wshp-1".into(),
            name: None,
            nominal_tons: 5.0,
            design_cfm: None,
            design_water_flow_gpm: None,
            compressor_rla: rla,
            refrigerant: "R-410A".into(),
            metering: MeteringDevice::Txv,
            expected_ranges: ManufacturerRanges::default(),
            pt_override: None,
        }
    }

    fn nominal() -> CompressorMeasurements {
        CompressorMeasurements {
            suction_pressure_psig: Some(120.0),
            discharge_pressure_psig: Some(300.0),
            compressor_amps: Some(18.0),
            discharge_line_temp_f: Some(165.0),
            ..Default::default()
        }
    }

    #[test]
    fn nominal_scroll_is_ok() {
        let result = ScrollCompressorEngine::new().evaluate(&nominal(), &profile(Some(24.0)));
        assert_eq!(result.status, Status::Ok);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].id, "scroll_trend_monitoring");
    }

    #[test]
    fn discharge_temperature_ladder() {
        assert_eq!(classify_discharge_temp(180.0), Status::Ok);
        assert_eq!(classify_discharge_temp(210.0), Status::Warning);
        assert_eq!(classify_discharge_temp(235.0), Status::Alert);
        assert_eq!(classify_discharge_temp(260.0), Status::Critical);
        assert_eq!(classify_discharge_temp(f64::NAN), Status::Unknown);
    }

    #[test]
    fn critical_discharge_temperature_requires_shutdown() {
        let mut m = nominal();
        m.discharge_line_temp_f = Some(262.0);
        let result = ScrollCompressorEngine::new().evaluate(&m, &profile(Some(24.0)));
        assert_eq!(result.status, Status::Critical);
        let rec = result
            .recommendations
            .iter()
            .find(|r| r.id == "high_discharge_temperature")
            .expect("discharge temperature recommendation");
        assert!(rec.requires_shutdown);
        assert_eq!(rec.severity, Severity::Critical);
    }

    #[test]
    fn missing_rla_with_extreme_amps_still_goes_critical() {
        let mut m = nominal();
        m.compressor_amps = Some(48.0);
        let result = ScrollCompressorEngine::new().evaluate(&m, &profile(None));
        assert_eq!(result.flags.status("motor_current"), Status::Critical);
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("absolute limit"))
        );
    }

    #[test]
    fn cylinder_fields_are_ignored() {
        let mut m = nominal();
        m.cylinders_total = Some(4);
        m.cylinders_unloaded = Some(4);
        let result = ScrollCompressorEngine::new().evaluate(&m, &profile(Some(24.0)));
        assert_eq!(result.flags.status("unloading"), Status::Unknown);
        assert_eq!(result.status, Status::Ok);
    }

    #[test]
    fn near_unity_ratio_is_compression_loss() {
        let m = CompressorMeasurements {
            suction_pressure_psig: Some(120.0),
            discharge_pressure_psig: Some(128.0),
            ..Default::default()
        };
        let result = ScrollCompressorEngine::new().evaluate(&m, &profile(None));
        assert!(result.recommendations.iter().any(|r| r.id == "compression_loss"));
    }
}
