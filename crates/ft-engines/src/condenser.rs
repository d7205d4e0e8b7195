//! Condenser approach engine: condensing temperature over entering water,
//! the first indicator of a scaled or fouled refrigerant-to-water exchanger.

use crate::common::{classify_with_margins, finalize_recommendations, severity_for};
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{
    Domain, EngineResult, Flags, Intent, RangeDef, Recommendation, Status, resolve_range,
};
use ft_profile::{CondenserMeasurements, EquipmentProfile};
use ft_refrigerants::{CurveSelection, Refrigerant, SaturationCurve, SaturationLookup};
use std::collections::BTreeMap;
use tracing::debug;

const APPROACH_INDUSTRY: RangeDef = RangeDef {
    min: 5.0,
    ideal: 12.0,
    max: 25.0,
};
const SUBCOOLING_INDUSTRY: RangeDef = RangeDef {
    min: 6.0,
    ideal: 10.0,
    max: 14.0,
};

pub struct CondenserApproachEngine {
    lookup: SaturationLookup,
    manual_override: Option<SaturationCurve>,
}

impl CondenserApproachEngine {
    pub fn new(lookup: SaturationLookup) -> Self {
        Self {
            lookup,
            manual_override: None,
        }
    }

    pub fn with_manual_override(mut self, curve: Option<SaturationCurve>) -> Self {
        self.manual_override = curve;
        self
    }
}

impl DiagnosticEngine for CondenserApproachEngine {
    type Measurements = CondenserMeasurements;

    fn domain(&self) -> Domain {
        Domain::CondenserApproach
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.entering_water_temp_f.is_none() {
            issues.push("entering water temperature is required".to_string());
        }
        if m.discharge_pressure_psig.is_none() && m.liquid_line_temp_f.is_none() {
            issues.push(
                "either discharge pressure or liquid line temperature is required".to_string(),
            );
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();

        let refrigerant = Refrigerant::parse(&profile.refrigerant);
        let profile_curve = profile
            .pt_override
            .as_ref()
            .map(|points| SaturationCurve::new(points.clone()));
        let override_curve = self.manual_override.as_ref().or(profile_curve.as_ref());
        let selection = CurveSelection::select(&self.lookup, refrigerant, override_curve);
        flags.tag("saturation_source", selection.source.as_str());
        if let Some(disclaimer) = &selection.disclaimer {
            flags.disclaim(disclaimer.clone());
        }

        // Condensing temperature: from discharge pressure when available,
        // otherwise the liquid line temperature stands in (it reads low by
        // the subcooling amount).
        let condensing_temp = match m.discharge_pressure_psig {
            Some(discharge_p) => {
                let sat = selection.saturation_temp(discharge_p);
                if sat.extrapolated {
                    flags.disclaim(format!(
                        "Discharge pressure {discharge_p:.0} psig is outside the tabulated \
                         saturation range; temperature was extrapolated"
                    ));
                }
                flags.tag("approach_basis", "discharge_pressure");
                values.insert("condensing_saturation_temp_f".to_string(), sat.value_f);
                Some(sat.value_f)
            }
            None => match m.liquid_line_temp_f {
                Some(liquid_t) => {
                    flags.tag("approach_basis", "liquid_line_proxy");
                    flags.disclaim(
                        "Discharge pressure not measured; liquid line temperature used as \
                         the condensing proxy and the approach reads low by the subcooling \
                         amount",
                    );
                    Some(liquid_t)
                }
                None => None,
            },
        };

        match (condensing_temp, m.entering_water_temp_f) {
            (Some(condensing), Some(ewt)) => {
                let approach = condensing - ewt;
                values.insert("condenser_approach_f".to_string(), approach);

                let resolved = resolve_range(
                    "condenser approach",
                    profile.expected_ranges.condenser_approach,
                    None,
                    APPROACH_INDUSTRY,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                flags.tag("approach_range_source", resolved.range.source.as_str());
                let status = classify_with_margins(approach, &resolved.range, 5.0, 12.0);
                flags.set_status("approach", status);
                if status != Status::Ok {
                    flags.tag(
                        "approach_deviation",
                        if approach < resolved.range.ideal { "low" } else { "high" },
                    );
                }
            }
            _ => {
                flags.set_status("approach", Status::Unknown);
                flags.disclaim(
                    "Condenser approach requires entering water temperature and a \
                     condensing temperature source",
                );
            }
        }

        // Subcooling as a secondary check when both high-side readings exist.
        if let (Some(discharge_p), Some(liquid_t)) =
            (m.discharge_pressure_psig, m.liquid_line_temp_f)
        {
            let sat = selection.saturation_temp(discharge_p);
            let subcooling = sat.value_f - liquid_t;
            values.insert("subcooling_f".to_string(), subcooling);
            let resolved = resolve_range(
                "subcooling",
                profile.expected_ranges.subcooling,
                None,
                SUBCOOLING_INDUSTRY,
            );
            if let Some(disclaimer) = resolved.disclaimer {
                flags.disclaim(disclaimer);
            }
            flags.set_status(
                "subcooling",
                classify_with_margins(subcooling, &resolved.range, 6.0, 12.0),
            );
        }

        let recommendations = recommendations(&flags);
        let result =
            EngineResult::finalize(Domain::CondenserApproach, values, flags, recommendations);
        debug!(status = %result.status, "condenser approach evaluation complete");
        result
    }
}

fn recommendations(flags: &Flags) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::CondenserApproach;

    let approach_status = flags.status("approach");
    if approach_status.is_abnormal() || approach_status == Status::Warning {
        match flags.tag_value("approach_deviation") {
            Some("high") => recs.push(Recommendation::new(
                "high_condenser_approach",
                domain,
                severity_for(approach_status),
                Intent::Diagnostic,
                "Condensing temperature is far above entering water; scale or fouling \
                 on the water side of the condenser is suspected",
            )),
            Some("low") => recs.push(Recommendation::new(
                "low_condenser_approach",
                domain,
                severity_for(approach_status),
                Intent::Diagnostic,
                "Condenser approach is unusually tight; verify sensor placement and \
                 water flow before trusting the reading",
            )),
            _ => {}
        }
    }

    let subcooling_status = flags.status("subcooling");
    if subcooling_status.is_abnormal() || subcooling_status == Status::Warning {
        recs.push(Recommendation::new(
            "condenser_subcooling_abnormal",
            domain,
            severity_for(subcooling_status),
            Intent::Diagnostic,
            "High-side subcooling is outside the expected band; charge level or \
             condenser liquid management is suspect",
        ));
    }

    finalize_recommendations(domain, "condenser_trend_monitoring", recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_profile::{ManufacturerRanges, MeteringDevice};

    fn profile() -> EquipmentProfile {
        EquipmentProfile {
            id: "wshp-1".into(),
            name: None,
            nominal_tons: 5.0,
            design_cfm: None,
            design_water_flow_gpm: None,
            compressor_rla: None,
            refrigerant: "R-410A".into(),
            metering: MeteringDevice::Txv,
            expected_ranges: ManufacturerRanges::default(),
            pt_override: None,
        }
    }

    fn engine() -> CondenserApproachEngine {
        CondenserApproachEngine::new(SaturationLookup::builtin())
    }

    #[test]
    fn healthy_approach_is_ok() {
        // 300 psig R-410A condenses near 96 °F; 85 °F entering water gives
        // roughly an 11 °F approach.
        let m = CondenserMeasurements {
            discharge_pressure_psig: Some(300.0),
            liquid_line_temp_f: Some(86.0),
            entering_water_temp_f: Some(85.0),
        };
        let result = engine().evaluate(&m, &profile());
        assert_eq!(result.flags.status("approach"), Status::Ok);
        let approach = result.value("condenser_approach_f").unwrap();
        assert!(approach > 9.0 && approach < 13.0, "approach {approach}");
    }

    #[test]
    fn fouled_condenser_elevates_the_approach() {
        // High head with cool entering water: an approach in the high 30s.
        let m = CondenserMeasurements {
            discharge_pressure_psig: Some(340.0),
            liquid_line_temp_f: None,
            entering_water_temp_f: Some(68.0),
        };
        let result = engine().evaluate(&m, &profile());
        assert!(result.flags.status("approach") >= Status::Alert);
        assert_eq!(result.flags.tag_value("approach_deviation"), Some("high"));
        assert!(
            result
                .recommendations
                .iter()
                .any(|r| r.id == "high_condenser_approach")
        );
    }

    #[test]
    fn liquid_line_proxy_when_discharge_pressure_missing() {
        let m = CondenserMeasurements {
            discharge_pressure_psig: None,
            liquid_line_temp_f: Some(95.0),
            entering_water_temp_f: Some(85.0),
        };
        let result = engine().evaluate(&m, &profile());
        assert_eq!(
            result.flags.tag_value("approach_basis"),
            Some("liquid_line_proxy")
        );
        assert_ne!(result.flags.status("approach"), Status::Unknown);
        assert!(
            result
                .flags
                .disclaimers
                .iter()
                .any(|d| d.contains("condensing proxy"))
        );
    }

    #[test]
    fn missing_entering_water_is_unknown() {
        let m = CondenserMeasurements {
            discharge_pressure_psig: Some(300.0),
            liquid_line_temp_f: Some(95.0),
            entering_water_temp_f: None,
        };
        let result = engine().evaluate(&m, &profile());
        assert_eq!(result.flags.status("approach"), Status::Unknown);
        let validation = engine().validate(&m);
        assert!(!validation.ok);
    }

    #[test]
    fn manufacturer_approach_range_wins() {
        let mut p = profile();
        p.expected_ranges.condenser_approach = Some(RangeDef {
            min: 20.0,
            ideal: 30.0,
            max: 40.0,
        });
        let m = CondenserMeasurements {
            discharge_pressure_psig: Some(340.0),
            liquid_line_temp_f: None,
            entering_water_temp_f: Some(68.0),
        };
        let result = engine().evaluate(&m, &p);
        assert_eq!(
            result.flags.tag_value("approach_range_source"),
            Some("manufacturer")
        );
        assert_eq!(result.flags.status("approach"), Status::Ok);
    }

    #[test]
    fn subcooling_secondary_check_fires() {
        let m = CondenserMeasurements {
            discharge_pressure_psig: Some(300.0),
            liquid_line_temp_f: Some(70.0), // subcooling near 26 °F
            entering_water_temp_f: Some(85.0),
        };
        let result = engine().evaluate(&m, &profile());
        assert!(result.flags.status("subcooling").is_abnormal());
        assert!(
            result
                .recommendations
                .iter()
                .any(|r| r.id == "condenser_subcooling_abnormal")
        );
    }
}
