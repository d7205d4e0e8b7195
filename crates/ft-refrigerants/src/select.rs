//! Curve selection: built-in tables vs manual PT overrides.
//!
//! A manual override is honored only when the refrigerant identity is the
//! explicit `Other` sentinel. Named refrigerants always use the built-in
//! curve, even when an override is present; a technician must not be able
//! to silently redefine the physics of a known refrigerant. The ignored
//! override is surfaced as a disclaimer, never dropped quietly.

use crate::catalog::Refrigerant;
use crate::curve::{SaturationCurve, SaturationLookup, fallback_saturation_temp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveSource {
    Builtin,
    ManualOverride,
    FallbackFormula,
}

impl CurveSource {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveSource::Builtin => "builtin",
            CurveSource::ManualOverride => "manual_override",
            CurveSource::FallbackFormula => "fallback_formula",
        }
    }
}

/// One saturation-temperature answer with its quality markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatTemp {
    pub value_f: f64,
    /// Came from boundary-slope extrapolation outside the table bounds.
    pub extrapolated: bool,
    pub source: CurveSource,
}

/// The curve chosen for one evaluation, plus any disclaimer the selection
/// itself owes.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSelection {
    pub curve: Option<SaturationCurve>,
    pub source: CurveSource,
    pub disclaimer: Option<String>,
}

impl CurveSelection {
    pub fn select(
        lookup: &SaturationLookup,
        refrigerant: Refrigerant,
        override_curve: Option<&SaturationCurve>,
    ) -> CurveSelection {
        if refrigerant.is_known() {
            let disclaimer = override_curve.map(|_| {
                format!(
                    "Manual PT override ignored: {refrigerant} uses the built-in \
                     saturation curve"
                )
            });
            return match lookup.curve_for(refrigerant) {
                Some(curve) => CurveSelection {
                    curve: Some(curve.clone()),
                    source: CurveSource::Builtin,
                    disclaimer,
                },
                // No table for a named refrigerant; fall back, loudly.
                None => CurveSelection {
                    curve: None,
                    source: CurveSource::FallbackFormula,
                    disclaimer: Some(format!(
                        "No built-in saturation table for {refrigerant}; generic \
                         fallback formula in use"
                    )),
                },
            };
        }

        match override_curve {
            Some(curve) if curve.is_well_formed() => CurveSelection {
                curve: Some(curve.clone()),
                source: CurveSource::ManualOverride,
                disclaimer: Some(
                    "Saturation temperatures use a manually supplied PT table".to_string(),
                ),
            },
            Some(_) => CurveSelection {
                curve: None,
                source: CurveSource::FallbackFormula,
                disclaimer: Some(
                    "Manual PT override is malformed; generic fallback formula in use"
                        .to_string(),
                ),
            },
            None => CurveSelection {
                curve: None,
                source: CurveSource::FallbackFormula,
                disclaimer: Some(
                    "Unknown refrigerant with no PT table; generic fallback formula in use"
                        .to_string(),
                ),
            },
        }
    }

    /// Saturation temperature at `pressure_psig` through the selected curve,
    /// or the documented linear fallback when no curve is available.
    pub fn saturation_temp(&self, pressure_psig: f64) -> SatTemp {
        if let Some(curve) = &self.curve
            && let Some(value_f) = curve.temperature_for_pressure(pressure_psig)
        {
            return SatTemp {
                value_f,
                extrapolated: !curve.brackets(pressure_psig),
                source: self.source,
            };
        }
        SatTemp {
            value_f: fallback_saturation_temp(pressure_psig),
            extrapolated: false,
            source: CurveSource::FallbackFormula,
        }
    }
}
