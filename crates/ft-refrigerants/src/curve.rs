//! Saturation curves and the pressure → temperature lookup.

use crate::catalog::Refrigerant;
use crate::tables;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Linear fallback used only when no refrigerant-specific curve is
/// available (unknown refrigerant with no usable override). Roughly tracks
/// mid-range R-410A behavior; results based on it always carry a
/// disclaimer.
pub fn fallback_saturation_temp(pressure_psig: f64) -> f64 {
    0.215 * pressure_psig + 10.5
}

/// An ordered sequence of `(temperature °F, pressure psig)` pairs,
/// non-decreasing in pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationCurve {
    points: Cow<'static, [(f64, f64)]>,
}

impl SaturationCurve {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            points: Cow::Owned(points),
        }
    }

    pub fn from_static(points: &'static [(f64, f64)]) -> Self {
        Self {
            points: Cow::Borrowed(points),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// A curve is usable when it has at least two finite points and its
    /// pressures never decrease. Malformed curves answer `None` from
    /// [`temperature_for_pressure`](Self::temperature_for_pressure); the
    /// caller substitutes [`fallback_saturation_temp`].
    pub fn is_well_formed(&self) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        if self
            .points
            .iter()
            .any(|(t, p)| !t.is_finite() || !p.is_finite())
        {
            return false;
        }
        self.points.windows(2).all(|w| w[1].1 >= w[0].1)
    }

    /// Inclusive pressure bounds of the table, `None` when malformed.
    pub fn pressure_bounds(&self) -> Option<(f64, f64)> {
        if !self.is_well_formed() {
            return None;
        }
        let first = self.points.first()?.1;
        let last = self.points.last()?.1;
        Some((first, last))
    }

    /// True when `pressure` lies within the tabulated bounds, so the lookup
    /// interpolates rather than extrapolates.
    pub fn brackets(&self, pressure_psig: f64) -> bool {
        match self.pressure_bounds() {
            Some((lo, hi)) => pressure_psig >= lo && pressure_psig <= hi,
            None => false,
        }
    }

    /// Convert a pressure to a saturation temperature.
    ///
    /// Scans adjacent pairs and linearly interpolates by the pressure
    /// fraction. Pressures outside the table extrapolate along the slope of
    /// the nearest boundary segment rather than failing; edge-of-table
    /// readings degrade gracefully instead of refusing to classify. Callers
    /// that care can detect extrapolation via [`brackets`](Self::brackets).
    pub fn temperature_for_pressure(&self, pressure_psig: f64) -> Option<f64> {
        if !self.is_well_formed() || !pressure_psig.is_finite() {
            return None;
        }
        let points = self.points();

        for pair in points.windows(2) {
            let (t1, p1) = pair[0];
            let (t2, p2) = pair[1];
            let (lo, hi) = if p1 <= p2 { (p1, p2) } else { (p2, p1) };
            if pressure_psig >= lo && pressure_psig <= hi {
                if (p2 - p1).abs() < f64::EPSILON {
                    return Some(t1);
                }
                let fraction = (pressure_psig - p1) / (p2 - p1);
                return Some(t1 + fraction * (t2 - t1));
            }
        }

        // Outside the table: extrapolate from the nearest boundary segment.
        let (first, last) = (points[0], points[points.len() - 1]);
        let segment = if pressure_psig < first.1 {
            (points[0], points[1])
        } else {
            (points[points.len() - 2], last)
        };
        let ((t1, p1), (t2, p2)) = segment;
        if (p2 - p1).abs() < f64::EPSILON {
            return Some(t1);
        }
        let slope = (t2 - t1) / (p2 - p1);
        Some(t1 + slope * (pressure_psig - p1))
    }
}

/// The shared, read-only table of built-in saturation curves.
///
/// Constructed once and passed to engines at construction time; tests can
/// substitute curves via [`with_curve`](Self::with_curve).
#[derive(Debug, Clone)]
pub struct SaturationLookup {
    curves: BTreeMap<&'static str, SaturationCurve>,
}

impl SaturationLookup {
    /// Lookup over the built-in field-chart tables.
    pub fn builtin() -> Self {
        let mut curves = BTreeMap::new();
        curves.insert(
            Refrigerant::R410A.canonical_id(),
            SaturationCurve::from_static(tables::R410A_PT),
        );
        curves.insert(
            Refrigerant::R22.canonical_id(),
            SaturationCurve::from_static(tables::R22_PT),
        );
        curves.insert(
            Refrigerant::R134a.canonical_id(),
            SaturationCurve::from_static(tables::R134A_PT),
        );
        curves.insert(
            Refrigerant::R32.canonical_id(),
            SaturationCurve::from_static(tables::R32_PT),
        );
        curves.insert(
            Refrigerant::R407C.canonical_id(),
            SaturationCurve::from_static(tables::R407C_PT),
        );
        curves.insert(
            Refrigerant::R454B.canonical_id(),
            SaturationCurve::from_static(tables::R454B_PT),
        );
        Self { curves }
    }

    /// Substitute or add a curve (primarily for tests).
    pub fn with_curve(mut self, refrigerant: Refrigerant, curve: SaturationCurve) -> Self {
        self.curves.insert(refrigerant.canonical_id(), curve);
        self
    }

    pub fn curve_for(&self, refrigerant: Refrigerant) -> Option<&SaturationCurve> {
        if refrigerant == Refrigerant::Other {
            return None;
        }
        self.curves.get(refrigerant.canonical_id())
    }
}

impl Default for SaturationLookup {
    fn default() -> Self {
        Self::builtin()
    }
}
