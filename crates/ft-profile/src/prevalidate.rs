//! Structural pre-validation of a case file.
//!
//! Runs before any engine. `Error`-severity issues block the engine for the
//! affected domain; `Warning` issues let it run. Issues are data returned
//! to the caller, never panics; a physically severe but valid reading is a
//! successful classification downstream, not a validation failure.

use crate::schema::{FieldCase, MeasurementBundle};
use ft_core::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Plausible field bounds for any line/air/water temperature probe.
const TEMP_PLAUSIBLE_F: (f64, f64) = (-60.0, 300.0);
/// Gauge pressures above this are outside any residential/light-commercial
/// heat-pump circuit.
const PRESSURE_MAX_PSIG: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path: measurement group then field, e.g.
    /// `refrigeration.suction_pressure_psig`.
    pub field: String,
    pub code: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl ValidationIssue {
    fn error(field: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.to_string(),
            message: message.into(),
            severity: IssueSeverity::Error,
        }
    }

    fn warning(field: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.to_string(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        }
    }
}

/// Validate the full bundle. The returned list is in a stable
/// (profile-first, then domain-by-domain) order.
pub fn prevalidate(case: &FieldCase) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_profile(case, &mut issues);
    validate_measurements(&case.measurements, &mut issues);

    issues
}

/// Domains whose engines must not run because an `Error` issue touches one
/// of their fields.
pub fn blocked_domains(issues: &[ValidationIssue]) -> BTreeSet<Domain> {
    let mut blocked = BTreeSet::new();
    for issue in issues {
        if issue.severity != IssueSeverity::Error {
            continue;
        }
        let prefix = issue.field.split('.').next().unwrap_or("");
        match prefix {
            "refrigeration" => {
                blocked.insert(Domain::Refrigeration);
            }
            "airside" => {
                blocked.insert(Domain::Airside);
            }
            "hydronic" => {
                blocked.insert(Domain::Hydronic);
            }
            "condenser" => {
                blocked.insert(Domain::CondenserApproach);
            }
            "reciprocating_compressor" => {
                blocked.insert(Domain::ReciprocatingCompressor);
            }
            "scroll_compressor" => {
                blocked.insert(Domain::ScrollCompressor);
            }
            "reversing_valve" => {
                blocked.insert(Domain::ReversingValve);
            }
            // Nameplate capacity feeds the airflow and water-flow checks.
            "profile" if issue.field.contains("nominal_tons") => {
                blocked.insert(Domain::Airside);
                blocked.insert(Domain::Hydronic);
            }
            _ => {}
        }
    }
    blocked
}

fn validate_profile(case: &FieldCase, issues: &mut Vec<ValidationIssue>) {
    let profile = &case.profile;
    if profile.id.trim().is_empty() {
        issues.push(ValidationIssue::error(
            "profile.id",
            "missing_field",
            "equipment profile id is empty",
        ));
    }
    if !profile.nominal_tons.is_finite() || profile.nominal_tons <= 0.0 {
        issues.push(ValidationIssue::error(
            "profile.nominal_tons",
            "non_physical",
            format!(
                "nominal capacity must be a positive number of tons, got {}",
                profile.nominal_tons
            ),
        ));
    }
    if let Some(rla) = profile.compressor_rla
        && (!rla.is_finite() || rla <= 0.0)
    {
        issues.push(ValidationIssue::error(
            "profile.compressor_rla",
            "non_physical",
            format!("rated load amps must be positive, got {rla}"),
        ));
    }
}

fn validate_measurements(bundle: &MeasurementBundle, issues: &mut Vec<ValidationIssue>) {
    if let Some(m) = &bundle.refrigeration
        && !m.is_empty()
    {
        require(issues, "refrigeration.suction_pressure_psig", m.suction_pressure_psig);
        require(
            issues,
            "refrigeration.discharge_pressure_psig",
            m.discharge_pressure_psig,
        );
        require(issues, "refrigeration.suction_line_temp_f", m.suction_line_temp_f);
        require(issues, "refrigeration.liquid_line_temp_f", m.liquid_line_temp_f);

        check_pressure(issues, "refrigeration.suction_pressure_psig", m.suction_pressure_psig);
        check_pressure(
            issues,
            "refrigeration.discharge_pressure_psig",
            m.discharge_pressure_psig,
        );
        check_temp(issues, "refrigeration.suction_line_temp_f", m.suction_line_temp_f);
        check_temp(issues, "refrigeration.liquid_line_temp_f", m.liquid_line_temp_f);
        check_temp(issues, "refrigeration.entering_water_temp_f", m.entering_water_temp_f);
        check_temp(issues, "refrigeration.leaving_water_temp_f", m.leaving_water_temp_f);
        check_pressure_pair(
            issues,
            "refrigeration.discharge_pressure_psig",
            m.suction_pressure_psig,
            m.discharge_pressure_psig,
        );
    }

    if let Some(m) = &bundle.airside
        && !m.is_empty()
    {
        require(issues, "airside.return_air_temp_f", m.return_air_temp_f);
        require(issues, "airside.supply_air_temp_f", m.supply_air_temp_f);
        check_temp(issues, "airside.return_air_temp_f", m.return_air_temp_f);
        check_temp(issues, "airside.supply_air_temp_f", m.supply_air_temp_f);

        if let Some(cfm) = m.measured_cfm
            && (!cfm.is_finite() || cfm <= 0.0)
        {
            issues.push(ValidationIssue::error(
                "airside.measured_cfm",
                "non_physical",
                format!("measured airflow must be positive, got {cfm}"),
            ));
        }
        if let Some(tesp) = m.external_static_in_wc
            && (!tesp.is_finite() || tesp < 0.0)
        {
            issues.push(ValidationIssue::error(
                "airside.external_static_in_wc",
                "non_physical",
                format!("external static pressure cannot be negative, got {tesp}"),
            ));
        }
        if let Some(rh) = m.return_air_rh_percent {
            if !rh.is_finite() || !(0.0..=100.0).contains(&rh) {
                issues.push(ValidationIssue::error(
                    "airside.return_air_rh_percent",
                    "non_physical",
                    format!("relative humidity must be 0-100%, got {rh}"),
                ));
            } else if !(5.0..=90.0).contains(&rh) {
                issues.push(ValidationIssue::warning(
                    "airside.return_air_rh_percent",
                    "suspicious_value",
                    format!("return-air humidity {rh}% is unusual; verify the probe"),
                ));
            }
        }
    }

    if let Some(m) = &bundle.hydronic
        && !m.is_empty()
    {
        require(issues, "hydronic.entering_water_temp_f", m.entering_water_temp_f);
        require(issues, "hydronic.leaving_water_temp_f", m.leaving_water_temp_f);
        check_temp(issues, "hydronic.entering_water_temp_f", m.entering_water_temp_f);
        check_temp(issues, "hydronic.leaving_water_temp_f", m.leaving_water_temp_f);
        if let Some(gpm) = m.water_flow_gpm
            && (!gpm.is_finite() || gpm <= 0.0)
        {
            issues.push(ValidationIssue::error(
                "hydronic.water_flow_gpm",
                "non_physical",
                format!("water flow must be positive, got {gpm}"),
            ));
        }
    }

    if let Some(m) = &bundle.condenser
        && !m.is_empty()
    {
        require(issues, "condenser.discharge_pressure_psig", m.discharge_pressure_psig);
        require(issues, "condenser.entering_water_temp_f", m.entering_water_temp_f);
        check_pressure(issues, "condenser.discharge_pressure_psig", m.discharge_pressure_psig);
        check_temp(issues, "condenser.liquid_line_temp_f", m.liquid_line_temp_f);
        check_temp(issues, "condenser.entering_water_temp_f", m.entering_water_temp_f);
    }

    if let Some(m) = &bundle.reciprocating_compressor
        && !m.is_empty()
    {
        validate_compressor(issues, "reciprocating_compressor", m);
        if let (Some(total), Some(unloaded)) = (m.cylinders_total, m.cylinders_unloaded)
            && unloaded > total
        {
            issues.push(ValidationIssue::error(
                "reciprocating_compressor.cylinders_unloaded",
                "inconsistent_pair",
                format!("{unloaded} unloaded cylinders but only {total} total"),
            ));
        }
    }

    if let Some(m) = &bundle.scroll_compressor
        && !m.is_empty()
    {
        validate_compressor(issues, "scroll_compressor", m);
    }

    if let Some(m) = &bundle.reversing_valve
        && !m.is_empty()
    {
        require(issues, "reversing_valve.discharge_line_temp_f", m.discharge_line_temp_f);
        require(issues, "reversing_valve.suction_line_temp_f", m.suction_line_temp_f);
        require(
            issues,
            "reversing_valve.indoor_coil_line_temp_f",
            m.indoor_coil_line_temp_f,
        );
        require(
            issues,
            "reversing_valve.outdoor_coil_line_temp_f",
            m.outdoor_coil_line_temp_f,
        );
        check_temp(issues, "reversing_valve.discharge_line_temp_f", m.discharge_line_temp_f);
        check_temp(issues, "reversing_valve.suction_line_temp_f", m.suction_line_temp_f);
        check_temp(
            issues,
            "reversing_valve.indoor_coil_line_temp_f",
            m.indoor_coil_line_temp_f,
        );
        check_temp(
            issues,
            "reversing_valve.outdoor_coil_line_temp_f",
            m.outdoor_coil_line_temp_f,
        );
    }
}

fn validate_compressor(
    issues: &mut Vec<ValidationIssue>,
    group: &str,
    m: &crate::schema::CompressorMeasurements,
) {
    check_pressure(
        issues,
        &format!("{group}.suction_pressure_psig"),
        m.suction_pressure_psig,
    );
    check_pressure(
        issues,
        &format!("{group}.discharge_pressure_psig"),
        m.discharge_pressure_psig,
    );
    check_pressure_pair(
        issues,
        &format!("{group}.discharge_pressure_psig"),
        m.suction_pressure_psig,
        m.discharge_pressure_psig,
    );
    check_temp(
        issues,
        &format!("{group}.discharge_line_temp_f"),
        m.discharge_line_temp_f,
    );
    if let Some(amps) = m.compressor_amps
        && (!amps.is_finite() || amps < 0.0)
    {
        issues.push(ValidationIssue::error(
            format!("{group}.compressor_amps"),
            "non_physical",
            format!("compressor current cannot be negative, got {amps}"),
        ));
    }
}

fn require(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<f64>) {
    if value.is_none() {
        issues.push(ValidationIssue::error(
            field,
            "missing_field",
            format!("{field} is required for this measurement group"),
        ));
    }
}

fn check_pressure(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<f64>) {
    if let Some(p) = value
        && (!p.is_finite() || p <= 0.0 || p > PRESSURE_MAX_PSIG)
    {
        issues.push(ValidationIssue::error(
            field,
            "non_physical",
            format!("pressure {p} psig is outside the physically possible range"),
        ));
    }
}

fn check_temp(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<f64>) {
    if let Some(t) = value
        && (!t.is_finite() || t < TEMP_PLAUSIBLE_F.0 || t > TEMP_PLAUSIBLE_F.1)
    {
        issues.push(ValidationIssue::error(
            field,
            "non_physical",
            format!(
                "temperature {t} °F is outside the plausible probe range \
                 ({} to {} °F)",
                TEMP_PLAUSIBLE_F.0, TEMP_PLAUSIBLE_F.1
            ),
        ));
    }
}

fn check_pressure_pair(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    suction: Option<f64>,
    discharge: Option<f64>,
) {
    if let (Some(suction), Some(discharge)) = (suction, discharge)
        && discharge <= suction
    {
        issues.push(ValidationIssue::error(
            field,
            "inconsistent_pair",
            format!(
                "discharge pressure {discharge} psig is not above suction {suction} psig \
                 on a running circuit"
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn base_case() -> FieldCase {
        FieldCase {
            version: 1,
            profile: EquipmentProfile {
                id: "wshp-1".into(),
                name: None,
                nominal_tons: 5.0,
                design_cfm: Some(2000.0),
                design_water_flow_gpm: Some(15.0),
                compressor_rla: Some(22.0),
                refrigerant: "R-410A".into(),
                metering: MeteringDevice::Txv,
                expected_ranges: ManufacturerRanges::default(),
                pt_override: None,
            },
            measurements: MeasurementBundle::default(),
        }
    }

    #[test]
    fn clean_case_has_no_issues() {
        let mut case = base_case();
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(120.0),
            discharge_pressure_psig: Some(300.0),
            suction_line_temp_f: Some(55.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });
        assert!(prevalidate(&case).is_empty());
    }

    #[test]
    fn discharge_not_above_suction_is_an_error() {
        let mut case = base_case();
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(300.0),
            discharge_pressure_psig: Some(120.0),
            suction_line_temp_f: Some(55.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });
        let issues = prevalidate(&case);
        assert!(issues.iter().any(|i| i.code == "inconsistent_pair"));
        assert!(blocked_domains(&issues).contains(&Domain::Refrigeration));
    }

    #[test]
    fn negative_pressure_blocks_domain() {
        let mut case = base_case();
        case.measurements.refrigeration = Some(RefrigerationMeasurements {
            suction_pressure_psig: Some(-5.0),
            discharge_pressure_psig: Some(300.0),
            suction_line_temp_f: Some(55.0),
            liquid_line_temp_f: Some(95.0),
            ..Default::default()
        });
        let issues = prevalidate(&case);
        assert!(issues.iter().any(|i| i.code == "non_physical"));
        assert_eq!(
            blocked_domains(&issues).into_iter().collect::<Vec<_>>(),
            vec![Domain::Refrigeration]
        );
    }

    #[test]
    fn suspicious_humidity_is_warning_only() {
        let mut case = base_case();
        case.measurements.airside = Some(AirsideMeasurements {
            mode: OperatingMode::Cooling,
            return_air_temp_f: Some(75.0),
            supply_air_temp_f: Some(55.0),
            return_air_rh_percent: Some(95.0),
            ..Default::default()
        });
        let issues = prevalidate(&case);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
        assert!(blocked_domains(&issues).is_empty());
    }

    #[test]
    fn missing_required_field_is_error() {
        let mut case = base_case();
        case.measurements.reversing_valve = Some(ReversingValveMeasurements {
            mode: OperatingMode::Cooling,
            discharge_line_temp_f: Some(180.0),
            ..Default::default()
        });
        let issues = prevalidate(&case);
        assert!(issues.iter().all(|i| i.severity == IssueSeverity::Error));
        assert!(issues.iter().any(|i| i.code == "missing_field"));
        assert!(blocked_domains(&issues).contains(&Domain::ReversingValve));
    }

    #[test]
    fn bad_nameplate_blocks_derived_domains() {
        let mut case = base_case();
        case.profile.nominal_tons = 0.0;
        let issues = prevalidate(&case);
        let blocked = blocked_domains(&issues);
        assert!(blocked.contains(&Domain::Airside));
        assert!(blocked.contains(&Domain::Hydronic));
    }

    #[test]
    fn empty_group_is_not_validated() {
        let mut case = base_case();
        case.measurements.airside = Some(AirsideMeasurements::default());
        assert!(prevalidate(&case).is_empty());
    }
}
