//! Case file schema definitions.
//!
//! Field measurements are technician units throughout: °F, psig, CFM, gpm,
//! inches of water column. Missing readings are `None`, an explicit
//! "unknown", not an error.

use ft_core::RangeDef;
use serde::{Deserialize, Serialize};

/// One evaluation's input: the equipment profile plus the measurement
/// groups actually taken during the visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldCase {
    #[serde(default = "default_version")]
    pub version: u32,
    pub profile: EquipmentProfile,
    #[serde(default)]
    pub measurements: MeasurementBundle,
}

fn default_version() -> u32 {
    1
}

/// Nameplate and configuration data for one piece of equipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Nominal cooling capacity in tons.
    pub nominal_tons: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_cfm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_water_flow_gpm: Option<f64>,
    /// Compressor rated load amps from the nameplate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_rla: Option<f64>,
    /// Refrigerant identity as entered in the field ("R-410A", "410a", ...).
    pub refrigerant: String,
    #[serde(default)]
    pub metering: MeteringDevice,
    /// Manufacturer-supplied expected ranges; each present entry wins over
    /// any calculated or industry default.
    #[serde(default)]
    pub expected_ranges: ManufacturerRanges,
    /// Manually entered PT table, honored only for unknown refrigerants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pt_override: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteringDevice {
    #[default]
    Txv,
    Eev,
    FixedOrifice,
}

impl MeteringDevice {
    pub fn as_str(self) -> &'static str {
        match self {
            MeteringDevice::Txv => "txv",
            MeteringDevice::Eev => "eev",
            MeteringDevice::FixedOrifice => "fixed_orifice",
        }
    }
}

/// Optional manufacturer expected ranges, keyed by derived quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManufacturerRanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superheat: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcooling: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_delta_t: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfm_per_ton: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_delta_t: Option<RangeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser_approach: Option<RangeDef>,
}

/// Requested operating mode during the measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    #[default]
    Cooling,
    Heating,
    FanOnly,
}

impl OperatingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Cooling => "cooling",
            OperatingMode::Heating => "heating",
            OperatingMode::FanOnly => "fan_only",
        }
    }
}

/// Domain-scoped measurement groups. A group that is absent (or present
/// but empty) means the corresponding engine is deliberately skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasurementBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refrigeration: Option<RefrigerationMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airside: Option<AirsideMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydronic: Option<HydronicMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condenser: Option<CondenserMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reciprocating_compressor: Option<CompressorMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_compressor: Option<CompressorMeasurements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversing_valve: Option<ReversingValveMeasurements>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RefrigerationMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_pressure_psig: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_pressure_psig: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entering_water_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaving_water_temp_f: Option<f64>,
}

impl RefrigerationMeasurements {
    pub fn is_empty(&self) -> bool {
        self.suction_pressure_psig.is_none()
            && self.discharge_pressure_psig.is_none()
            && self.suction_line_temp_f.is_none()
            && self.liquid_line_temp_f.is_none()
            && self.entering_water_temp_f.is_none()
            && self.leaving_water_temp_f.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AirsideMeasurements {
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_air_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_air_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_cfm: Option<f64>,
    /// Total external static pressure, inches of water column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_static_in_wc: Option<f64>,
    /// Technician-entered airflow, accepted only inside the plausibility gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician_cfm_override: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_air_rh_percent: Option<f64>,
}

impl AirsideMeasurements {
    pub fn is_empty(&self) -> bool {
        self.return_air_temp_f.is_none()
            && self.supply_air_temp_f.is_none()
            && self.measured_cfm.is_none()
            && self.external_static_in_wc.is_none()
            && self.technician_cfm_override.is_none()
            && self.return_air_rh_percent.is_none()
    }
}

/// Which water circuit the hydronic readings describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydronicCircuit {
    /// The unit's load-side loop.
    #[default]
    Loop,
    /// The source side (ground loop, cooling tower, boiler water).
    Source,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HydronicMeasurements {
    #[serde(default)]
    pub circuit: HydronicCircuit,
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entering_water_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaving_water_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_flow_gpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_pressure_psig: Option<f64>,
}

impl HydronicMeasurements {
    pub fn is_empty(&self) -> bool {
        self.entering_water_temp_f.is_none()
            && self.leaving_water_temp_f.is_none()
            && self.water_flow_gpm.is_none()
            && self.loop_pressure_psig.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CondenserMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_pressure_psig: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entering_water_temp_f: Option<f64>,
}

impl CondenserMeasurements {
    pub fn is_empty(&self) -> bool {
        self.discharge_pressure_psig.is_none()
            && self.liquid_line_temp_f.is_none()
            && self.entering_water_temp_f.is_none()
    }
}

/// Shared by the reciprocating and scroll engines; the scroll engine
/// ignores the cylinder fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompressorMeasurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_pressure_psig: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_pressure_psig: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_amps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinders_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinders_unloaded: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audible_hissing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excessive_vibration: Option<bool>,
}

impl CompressorMeasurements {
    pub fn is_empty(&self) -> bool {
        self.suction_pressure_psig.is_none()
            && self.discharge_pressure_psig.is_none()
            && self.compressor_amps.is_none()
            && self.discharge_line_temp_f.is_none()
            && self.cylinders_total.is_none()
            && self.cylinders_unloaded.is_none()
            && self.audible_hissing.is_none()
            && self.excessive_vibration.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReversingValveMeasurements {
    #[serde(default)]
    pub mode: OperatingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suction_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor_coil_line_temp_f: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdoor_coil_line_temp_f: Option<f64>,
}

impl ReversingValveMeasurements {
    pub fn is_empty(&self) -> bool {
        self.discharge_line_temp_f.is_none()
            && self.suction_line_temp_f.is_none()
            && self.indoor_coil_line_temp_f.is_none()
            && self.outdoor_coil_line_temp_f.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_case_parses() {
        let yaml = r#"
profile:
  id: wshp-101
  nominal_tons: 5.0
  refrigerant: R-410A
measurements:
  airside:
    mode: cooling
    return_air_temp_f: 75.0
    supply_air_temp_f: 55.0
"#;
        let case: FieldCase = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(case.version, 1);
        assert_eq!(case.profile.metering, MeteringDevice::Txv);
        let airside = case.measurements.airside.unwrap();
        assert_eq!(airside.mode, OperatingMode::Cooling);
        assert!(!airside.is_empty());
        assert!(case.measurements.refrigeration.is_none());
    }

    #[test]
    fn empty_group_detected() {
        let airside = AirsideMeasurements::default();
        assert!(airside.is_empty());
        let refrigeration = RefrigerationMeasurements {
            suction_pressure_psig: Some(120.0),
            ..Default::default()
        };
        assert!(!refrigeration.is_empty());
    }

    #[test]
    fn json_round_trip_preserves_ranges() {
        let case = FieldCase {
            version: 1,
            profile: EquipmentProfile {
                id: "u1".into(),
                name: None,
                nominal_tons: 3.0,
                design_cfm: Some(1200.0),
                design_water_flow_gpm: None,
                compressor_rla: Some(14.2),
                refrigerant: "R-22".into(),
                metering: MeteringDevice::FixedOrifice,
                expected_ranges: ManufacturerRanges {
                    superheat: Some(ft_core::RangeDef {
                        min: 6.0,
                        ideal: 10.0,
                        max: 14.0,
                    }),
                    ..Default::default()
                },
                pt_override: None,
            },
            measurements: MeasurementBundle::default(),
        };
        let json = serde_json::to_string(&case).unwrap();
        let back: FieldCase = serde_json::from_str(&json).unwrap();
        assert_eq!(case, back);
    }
}
