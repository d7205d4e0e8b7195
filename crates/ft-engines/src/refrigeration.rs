//! Refrigerant circuit engine: superheat, subcooling, compression ratio,
//! and water-side delta-T.

use crate::common::{
    classify_compression_ratio, classify_with_margins, finalize_recommendations, psia,
    severity_for,
};
use crate::traits::{DiagnosticEngine, EngineValidation};
use ft_core::{
    Domain, EngineResult, Flags, Intent, RangeDef, Recommendation, Severity, Status,
    resolve_range,
};
use ft_profile::{EquipmentProfile, MeteringDevice, RefrigerationMeasurements};
use ft_refrigerants::{CurveSelection, Refrigerant, SaturationCurve, SaturationLookup};
use std::collections::BTreeMap;
use tracing::debug;

/// Industry-default superheat band for TXV/EEV metering.
const SUPERHEAT_TXV: RangeDef = RangeDef {
    min: 5.0,
    ideal: 10.0,
    max: 15.0,
};
/// Fixed-orifice superheat floats with load; the acceptable band is wider.
const SUPERHEAT_FIXED_ORIFICE: RangeDef = RangeDef {
    min: 5.0,
    ideal: 15.0,
    max: 25.0,
};
const SUBCOOLING_INDUSTRY: RangeDef = RangeDef {
    min: 6.0,
    ideal: 10.0,
    max: 14.0,
};
const COMPRESSION_RATIO_INDUSTRY: RangeDef = RangeDef {
    min: 2.0,
    ideal: 3.0,
    max: 4.5,
};
const WATER_DELTA_T_INDUSTRY: RangeDef = RangeDef {
    min: 8.0,
    ideal: 10.0,
    max: 14.0,
};

pub struct RefrigerationEngine {
    lookup: SaturationLookup,
    /// Store-supplied PT table for this visit; honored only when the
    /// refrigerant identity is the `Other` sentinel.
    manual_override: Option<SaturationCurve>,
}

impl RefrigerationEngine {
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

    fn saturation_selection(&self, profile: &EquipmentProfile) -> (Refrigerant, CurveSelection) {
        let refrigerant = Refrigerant::parse(&profile.refrigerant);
        let profile_curve = profile
            .pt_override
            .as_ref()
            .map(|points| SaturationCurve::new(points.clone()));
        // A store entry for this visit is fresher than a curve embedded in
        // the profile.
        let override_curve = self.manual_override.as_ref().or(profile_curve.as_ref());
        let selection = CurveSelection::select(&self.lookup, refrigerant, override_curve);
        (refrigerant, selection)
    }
}

impl DiagnosticEngine for RefrigerationEngine {
    type Measurements = RefrigerationMeasurements;

    fn domain(&self) -> Domain {
        Domain::Refrigeration
    }

    fn validate(&self, m: &Self::Measurements) -> EngineValidation {
        let mut issues = Vec::new();
        if m.suction_pressure_psig.is_none() {
            issues.push("suction pressure is required".to_string());
        }
        if m.discharge_pressure_psig.is_none() {
            issues.push("discharge pressure is required".to_string());
        }
        if m.suction_line_temp_f.is_none() {
            issues.push("suction line temperature is required".to_string());
        }
        if m.liquid_line_temp_f.is_none() {
            issues.push("liquid line temperature is required".to_string());
        }
        EngineValidation::from_issues(issues)
    }

    fn evaluate(&self, m: &Self::Measurements, profile: &EquipmentProfile) -> EngineResult {
        let mut values = BTreeMap::new();
        let mut flags = Flags::new();

        let (refrigerant, selection) = self.saturation_selection(profile);
        flags.tag(
            "refrigerant_profile",
            if refrigerant.is_known() {
                "standard"
            } else {
                "unknown"
            },
        );
        flags.tag("saturation_source", selection.source.as_str());
        if let Some(disclaimer) = &selection.disclaimer {
            flags.disclaim(disclaimer.clone());
        }

        // Superheat: suction line temperature above saturation at suction
        // pressure.
        match (m.suction_pressure_psig, m.suction_line_temp_f) {
            (Some(suction_p), Some(suction_t)) => {
                let sat = selection.saturation_temp(suction_p);
                if sat.extrapolated {
                    flags.tag("saturation_extrapolated", "true");
                    flags.disclaim(format!(
                        "Suction pressure {suction_p:.0} psig is outside the tabulated \
                         saturation range; temperature was extrapolated"
                    ));
                }
                let superheat = suction_t - sat.value_f;
                values.insert("suction_saturation_temp_f".to_string(), sat.value_f);
                values.insert("superheat_f".to_string(), superheat);

                // Liquid at the compressor inlet trumps any expected range.
                if superheat <= 0.0 {
                    flags.set_status("superheat", Status::Critical);
                    flags.tag("superheat_deviation", "low");
                } else {
                    let industry = match profile.metering {
                        MeteringDevice::Txv | MeteringDevice::Eev => SUPERHEAT_TXV,
                        MeteringDevice::FixedOrifice => SUPERHEAT_FIXED_ORIFICE,
                    };
                    let resolved = resolve_range(
                        "superheat",
                        profile.expected_ranges.superheat,
                        None,
                        industry,
                    );
                    if let Some(disclaimer) = resolved.disclaimer {
                        flags.disclaim(disclaimer);
                    }
                    flags.tag("superheat_range_source", resolved.range.source.as_str());
                    let status = classify_with_margins(superheat, &resolved.range, 5.0, 12.0);
                    flags.set_status("superheat", status);
                    if status != Status::Ok {
                        flags.tag(
                            "superheat_deviation",
                            if superheat < resolved.range.ideal {
                                "low"
                            } else {
                                "high"
                            },
                        );
                    }
                }
            }
            _ => {
                flags.set_status("superheat", Status::Unknown);
                flags.disclaim(
                    "Superheat cannot be computed without suction pressure and \
                     suction line temperature",
                );
            }
        }

        // Subcooling: condensing saturation minus liquid line temperature.
        match (m.discharge_pressure_psig, m.liquid_line_temp_f) {
            (Some(discharge_p), Some(liquid_t)) => {
                let sat = selection.saturation_temp(discharge_p);
                if sat.extrapolated {
                    flags.tag("saturation_extrapolated", "true");
                    flags.disclaim(format!(
                        "Discharge pressure {discharge_p:.0} psig is outside the tabulated \
                         saturation range; temperature was extrapolated"
                    ));
                }
                let subcooling = sat.value_f - liquid_t;
                values.insert("condensing_saturation_temp_f".to_string(), sat.value_f);
                values.insert("subcooling_f".to_string(), subcooling);

                if subcooling <= 0.0 {
                    // Liquid line at or above condensing temperature: flash
                    // gas is reaching the metering device.
                    flags.set_status("subcooling", Status::Critical);
                    flags.tag("subcooling_deviation", "low");
                } else {
                    let resolved = resolve_range(
                        "subcooling",
                        profile.expected_ranges.subcooling,
                        None,
                        SUBCOOLING_INDUSTRY,
                    );
                    if let Some(disclaimer) = resolved.disclaimer {
                        flags.disclaim(disclaimer);
                    }
                    flags.tag("subcooling_range_source", resolved.range.source.as_str());
                    let status = classify_with_margins(subcooling, &resolved.range, 6.0, 12.0);
                    flags.set_status("subcooling", status);
                    if status != Status::Ok {
                        flags.tag(
                            "subcooling_deviation",
                            if subcooling < resolved.range.ideal {
                                "low"
                            } else {
                                "high"
                            },
                        );
                    }
                }
            }
            _ => {
                flags.set_status("subcooling", Status::Unknown);
                flags.disclaim(
                    "Subcooling cannot be computed without discharge pressure and \
                     liquid line temperature",
                );
            }
        }

        // Compression ratio over absolute pressures.
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

        // Water-side delta-T across the coax.
        match (m.entering_water_temp_f, m.leaving_water_temp_f) {
            (Some(ewt), Some(lwt)) => {
                let delta_t = (lwt - ewt).abs();
                values.insert("water_delta_t_f".to_string(), delta_t);
                let resolved = resolve_range(
                    "water-side delta-T",
                    profile.expected_ranges.water_delta_t,
                    None,
                    WATER_DELTA_T_INDUSTRY,
                );
                if let Some(disclaimer) = resolved.disclaimer {
                    flags.disclaim(disclaimer);
                }
                flags.set_status(
                    "water_delta_t",
                    classify_with_margins(delta_t, &resolved.range, 3.0, 6.0),
                );
            }
            _ => {
                flags.set_status("water_delta_t", Status::Unknown);
                flags.disclaim("Water-side delta-T requires entering and leaving water temperatures");
            }
        }

        let recommendations = recommendations(refrigerant, &values, &flags);
        let result = EngineResult::finalize(Domain::Refrigeration, values, flags, recommendations);
        debug!(status = %result.status, "refrigeration evaluation complete");
        result
    }
}

/// Recommendation generator. Reads only the finalized values/flags; the
/// flags are the single source of truth, never the raw measurements.
fn recommendations(
    refrigerant: Refrigerant,
    values: &BTreeMap<String, f64>,
    flags: &Flags,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let domain = Domain::Refrigeration;

    let superheat_status = flags.status("superheat");
    let superheat = values.get("superheat_f").copied();
    if superheat_status == Status::Critical && superheat.is_some_and(|sh| sh <= 0.0) {
        recs.push(
            Recommendation::new(
                "liquid_floodback_risk",
                domain,
                Severity::Critical,
                Intent::Safety,
                "Zero or negative superheat indicates liquid refrigerant returning to \
                 the compressor",
            )
            .with_rationale(
                "Saturated refrigerant at the suction line means the evaporator is not \
                 fully boiling off liquid; continued operation risks slugging damage",
            )
            .with_shutdown(),
        );
    } else if superheat_status.is_abnormal() || superheat_status == Status::Warning {
        match flags.tag_value("superheat_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_superheat",
                domain,
                severity_for(superheat_status),
                Intent::Diagnostic,
                "Superheat is below the expected band; metering device overfeeding or \
                 low evaporator load is suspected",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_superheat",
                domain,
                severity_for(superheat_status),
                Intent::Diagnostic,
                "Superheat is above the expected band; consistent with low refrigerant \
                 charge or a liquid-line restriction",
            )),
            _ => {}
        }
    }

    let subcooling_status = flags.status("subcooling");
    if subcooling_status.is_abnormal() || subcooling_status == Status::Warning {
        match flags.tag_value("subcooling_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_subcooling",
                domain,
                severity_for(subcooling_status),
                Intent::Diagnostic,
                "Subcooling is below the expected band; consistent with low charge or \
                 flash gas ahead of the metering device",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_subcooling",
                domain,
                severity_for(subcooling_status),
                Intent::Diagnostic,
                "Subcooling is above the expected band; consistent with overcharge or \
                 liquid backing up in the condenser",
            )),
            _ => {}
        }
    }

    let ratio_status = flags.status("compression_ratio");
    if ratio_status.is_abnormal() || ratio_status == Status::Warning {
        match flags.tag_value("compression_ratio_deviation") {
            Some("low") => recs.push(Recommendation::new(
                "low_compression_ratio",
                domain,
                severity_for(ratio_status),
                Intent::Diagnostic,
                "Compression ratio is abnormally low; internal pressure equalization or \
                 compressor valve trouble is suspected",
            )),
            Some("high") => recs.push(Recommendation::new(
                "high_compression_ratio",
                domain,
                severity_for(ratio_status),
                Intent::Diagnostic,
                "Compression ratio is abnormally high; poor condenser heat rejection or \
                 a high-side restriction is suspected",
            )),
            _ => {}
        }
    }

    let water_status = flags.status("water_delta_t");
    if water_status.is_abnormal() || water_status == Status::Warning {
        recs.push(Recommendation::new(
            "water_side_delta_t_abnormal",
            domain,
            severity_for(water_status),
            Intent::Diagnostic,
            "Water-side temperature split across the refrigerant-to-water exchanger is \
             outside the expected band",
        ));
    }

    if !refrigerant.is_known() {
        recs.push(Recommendation::new(
            "refrigerant_profile_unknown",
            domain,
            Severity::Info,
            Intent::Diagnostic,
            "Refrigerant identity was not recognized; saturation temperatures come from \
             a manual PT table or the generic fallback and classifications are less \
             certain",
        ));
    }

    finalize_recommendations(domain, "refrigeration_trend_monitoring", recs)
}
