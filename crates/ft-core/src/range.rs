//! Expected operating ranges with source-of-truth provenance.

use serde::{Deserialize, Serialize};

/// Where an expected range came from.
///
/// Precedence is fixed: manufacturer-provided ranges always win, then a
/// range calculated from nameplate data, then a conservative industry
/// default. Industry defaults must be accompanied by a disclaimer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeSource {
    Manufacturer,
    NameplateCalculated,
    Industry,
}

impl RangeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeSource::Manufacturer => "manufacturer",
            RangeSource::NameplateCalculated => "nameplate_calculated",
            RangeSource::Industry => "industry",
        }
    }
}

/// A `{min, ideal, max}` triple as supplied by a profile (no provenance yet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeDef {
    pub min: f64,
    pub ideal: f64,
    pub max: f64,
}

/// An expected range plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub min: f64,
    pub ideal: f64,
    pub max: f64,
    pub source: RangeSource,
}

impl ExpectedRange {
    pub fn new(min: f64, ideal: f64, max: f64, source: RangeSource) -> Self {
        Self {
            min,
            ideal,
            max,
            source,
        }
    }

    pub fn from_def(def: RangeDef, source: RangeSource) -> Self {
        Self::new(def.min, def.ideal, def.max, source)
    }

    /// True when `value` lies within `[min, max]` inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Signed distance from `value` to the nearest bound, 0 when inside.
    pub fn excursion(&self, value: f64) -> f64 {
        if value < self.min {
            value - self.min
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// A resolved range plus the disclaimer owed when falling back to an
/// industry default.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRange {
    pub range: ExpectedRange,
    pub disclaimer: Option<String>,
}

/// Resolve an expected range for one quantity using the fixed
/// manufacturer > nameplate-calculated > industry precedence.
///
/// `quantity` names the measured quantity for the disclaimer text.
pub fn resolve_range(
    quantity: &str,
    manufacturer: Option<RangeDef>,
    nameplate: Option<RangeDef>,
    industry: RangeDef,
) -> ResolvedRange {
    if let Some(def) = manufacturer {
        return ResolvedRange {
            range: ExpectedRange::from_def(def, RangeSource::Manufacturer),
            disclaimer: None,
        };
    }
    if let Some(def) = nameplate {
        return ResolvedRange {
            range: ExpectedRange::from_def(def, RangeSource::NameplateCalculated),
            disclaimer: None,
        };
    }
    ResolvedRange {
        range: ExpectedRange::from_def(industry, RangeSource::Industry),
        disclaimer: Some(format!(
            "Expected range for {quantity} uses a conservative industry default; \
             manufacturer data was not available"
        )),
    }
}
