//! Helpers shared by all engines: threshold ladders, pressure conversion,
//! compressor sub-checks, and the never-empty recommendation rule.

use ft_core::{
    Domain, ExpectedRange, Flags, Intent, Recommendation, Severity, Status,
    recommendation::sort_by_severity,
};

/// Standard atmosphere offset for gauge → absolute pressure.
pub const ATMOSPHERE_PSI: f64 = 14.7;

/// Measured compressor current above this, with no nameplate RLA to compare
/// against, is treated as critical on its own.
pub const EXTREME_AMPS_WITHOUT_RLA: f64 = 40.0;

pub fn psia(psig: f64) -> f64 {
    psig + ATMOSPHERE_PSI
}

/// Classify `value` against a resolved range with absolute excursion
/// margins: inside the range is `Ok`, an excursion under `warn` is
/// `Warning`, under `alert` is `Alert`, anything further is `Critical`.
///
/// Extreme-value short-circuits belong in the engine, before this call.
pub fn classify_with_margins(value: f64, range: &ExpectedRange, warn: f64, alert: f64) -> Status {
    if !value.is_finite() {
        return Status::Unknown;
    }
    let excursion = range.excursion(value).abs();
    if excursion <= 0.0 {
        Status::Ok
    } else if excursion < warn {
        Status::Warning
    } else if excursion < alert {
        Status::Alert
    } else {
        Status::Critical
    }
}

/// Map an abnormal status to the severity of the recommendation it drives.
pub fn severity_for(status: Status) -> Severity {
    match status {
        Status::Critical => Severity::Critical,
        Status::Alert => Severity::Alert,
        Status::Warning => Severity::Advisory,
        Status::Ok | Status::Unknown => Severity::Info,
    }
}

/// An engine result never carries zero recommendations: when nothing
/// fired, emit exactly one informational preventive/trend-monitoring
/// record. Also fixes the list into deterministic severity-rank order.
pub fn finalize_recommendations(
    domain: Domain,
    fallback_id: &str,
    mut recommendations: Vec<Recommendation>,
) -> Vec<Recommendation> {
    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            fallback_id,
            domain,
            Severity::Info,
            Intent::Diagnostic,
            format!(
                "All {domain} checks are within expected ranges; continue routine \
                 trend monitoring"
            ),
        ));
    }
    sort_by_severity(&mut recommendations);
    recommendations
}

/// Compression-ratio sub-check shared by the refrigeration and compressor
/// engines. Ratio below 1.2 absolute is an immediate Critical (the circuit
/// is barely compressing), checked before any range comparison.
pub fn classify_compression_ratio(ratio: f64, range: &ExpectedRange) -> Status {
    if !ratio.is_finite() {
        return Status::Unknown;
    }
    if ratio < 1.2 {
        return Status::Critical;
    }
    classify_with_margins(ratio, range, 1.0, 2.5)
}

/// Current-vs-RLA sub-check shared by both compressor engines.
///
/// With a nameplate RLA the per-unit draw is laddered against
/// `[0.45, 1.10]`. Without one, an extreme absolute reading still fires
/// Critical; missing nameplate data must never silently read as "ok".
pub fn classify_motor_current(
    domain: Domain,
    amps: Option<f64>,
    rla: Option<f64>,
    flags: &mut Flags,
    recommendations: &mut Vec<Recommendation>,
) -> Option<f64> {
    let Some(amps) = amps else {
        flags.set_status("motor_current", Status::Unknown);
        flags.disclaim("Compressor current not measured; motor-current check skipped");
        return None;
    };

    match rla {
        Some(rla) if rla > 0.0 => {
            let pct = amps / rla;
            let range = ExpectedRange::new(0.45, 0.85, 1.10, ft_core::RangeSource::Industry);
            let status = classify_with_margins(pct, &range, 0.10, 0.20);
            flags.set_status("motor_current", status);

            if status.is_abnormal() && pct > 1.0 {
                let mut rec = Recommendation::new(
                    "compressor_overcurrent",
                    domain,
                    severity_for(status),
                    if status == Status::Critical {
                        Intent::Safety
                    } else {
                        Intent::Diagnostic
                    },
                    format!(
                        "Compressor draw is {:.0}% of rated load amps; mechanical binding \
                         or an electrical fault is suspected",
                        pct * 100.0
                    ),
                );
                if status == Status::Critical {
                    rec = rec.with_shutdown();
                }
                recommendations.push(rec);
            } else if status.is_abnormal() {
                recommendations.push(Recommendation::new(
                    "compressor_undercurrent",
                    domain,
                    severity_for(status),
                    Intent::Diagnostic,
                    format!(
                        "Compressor draw is only {:.0}% of rated load amps; loss of \
                         refrigerant mass flow or unloaded operation is suspected",
                        pct * 100.0
                    ),
                ));
            }
            Some(pct)
        }
        _ => {
            if amps >= EXTREME_AMPS_WITHOUT_RLA {
                flags.set_status("motor_current", Status::Critical);
                flags.disclaim(
                    "Rated load amps unavailable; current classified against an absolute limit",
                );
                recommendations.push(
                    Recommendation::new(
                        "compressor_overcurrent",
                        domain,
                        Severity::Critical,
                        Intent::Safety,
                        format!(
                            "Measured compressor current {amps:.1} A is extreme even without \
                             a nameplate rating for comparison"
                        ),
                    )
                    .with_shutdown(),
                );
            } else {
                flags.set_status("motor_current", Status::Unknown);
                flags.disclaim(
                    "Rated load amps unavailable; motor-current check cannot be classified",
                );
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_core::RangeSource;

    fn range(min: f64, ideal: f64, max: f64) -> ExpectedRange {
        ExpectedRange::new(min, ideal, max, RangeSource::Industry)
    }

    #[test]
    fn margins_ladder() {
        let r = range(16.0, 19.0, 22.0);
        assert_eq!(classify_with_margins(19.0, &r, 4.0, 10.0), Status::Ok);
        assert_eq!(classify_with_margins(24.0, &r, 4.0, 10.0), Status::Warning);
        assert_eq!(classify_with_margins(28.0, &r, 4.0, 10.0), Status::Alert);
        assert_eq!(classify_with_margins(45.0, &r, 4.0, 10.0), Status::Critical);
        assert_eq!(classify_with_margins(14.0, &r, 4.0, 10.0), Status::Warning);
        assert_eq!(classify_with_margins(f64::NAN, &r, 4.0, 10.0), Status::Unknown);
    }

    #[test]
    fn compression_ratio_floor_short_circuits() {
        let r = range(2.0, 3.0, 4.5);
        assert_eq!(classify_compression_ratio(1.1, &r), Status::Critical);
        assert_eq!(classify_compression_ratio(2.3, &r), Status::Ok);
        assert_eq!(classify_compression_ratio(9.0, &r), Status::Critical);
    }

    #[test]
    fn missing_rla_with_extreme_amps_is_critical() {
        let mut flags = Flags::new();
        let mut recs = Vec::new();
        classify_motor_current(
            Domain::ScrollCompressor,
            Some(55.0),
            None,
            &mut flags,
            &mut recs,
        );
        assert_eq!(flags.status("motor_current"), Status::Critical);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].requires_shutdown);
    }

    #[test]
    fn missing_rla_with_modest_amps_is_unknown_with_disclaimer() {
        let mut flags = Flags::new();
        let mut recs = Vec::new();
        classify_motor_current(
            Domain::ScrollCompressor,
            Some(12.0),
            None,
            &mut flags,
            &mut recs,
        );
        assert_eq!(flags.status("motor_current"), Status::Unknown);
        assert!(!flags.disclaimers.is_empty());
        assert!(recs.is_empty());
    }

    #[test]
    fn fallback_recommendation_fills_empty_list() {
        let recs = finalize_recommendations(Domain::Airside, "airside_trend_monitoring", vec![]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "airside_trend_monitoring");
        assert_eq!(recs[0].severity, Severity::Info);
        recs[0].validate().unwrap();
    }

    proptest::proptest! {
        #[test]
        fn larger_excursions_never_classify_lower(
            base in -50.0f64..50.0,
            extra in 0.0f64..100.0,
        ) {
            let r = range(16.0, 19.0, 22.0);
            let near = 19.0 + base;
            let far = if base >= 0.0 { near + extra } else { near - extra };
            let status_near = classify_with_margins(near, &r, 4.0, 10.0);
            let status_far = classify_with_margins(far, &r, 4.0, 10.0);
            proptest::prop_assert!(status_far >= status_near);
        }
    }

    #[test]
    fn finalize_sorts_by_rank() {
        let recs = vec![
            Recommendation::new(
                "info_item",
                Domain::Airside,
                Severity::Info,
                Intent::Diagnostic,
                "informational",
            ),
            Recommendation::new(
                "critical_item",
                Domain::Airside,
                Severity::Critical,
                Intent::Safety,
                "critical",
            ),
        ];
        let sorted = finalize_recommendations(Domain::Airside, "unused", recs);
        assert_eq!(sorted[0].id, "critical_item");
    }
}
