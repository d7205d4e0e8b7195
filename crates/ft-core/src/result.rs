//! The canonical engine result shape.

use crate::recommendation::Recommendation;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Evaluation domain. `Controls` is synthetic: it carries cross-domain
/// correlation findings produced by the orchestrator and never has an
/// engine of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Refrigeration,
    Airside,
    Hydronic,
    CondenserApproach,
    ReciprocatingCompressor,
    ScrollCompressor,
    ReversingValve,
    Controls,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Refrigeration => "refrigeration",
            Domain::Airside => "airside",
            Domain::Hydronic => "hydronic",
            Domain::CondenserApproach => "condenser_approach",
            Domain::ReciprocatingCompressor => "reciprocating_compressor",
            Domain::ScrollCompressor => "scroll_compressor",
            Domain::ReversingValve => "reversing_valve",
            Domain::Controls => "controls",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-sub-check statuses, provenance tags, and disclaimers.
///
/// Maps are `BTreeMap` so iteration order (and therefore serialized output
/// and any derived text) is deterministic. Disclaimers keep append order
/// but duplicates are dropped, so re-running an evaluation with identical
/// inputs yields an identical list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flags {
    pub statuses: BTreeMap<String, Status>,
    pub tags: BTreeMap<String, String>,
    pub disclaimers: Vec<String>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, check: impl Into<String>, status: Status) {
        self.statuses.insert(check.into(), status);
    }

    pub fn status(&self, check: &str) -> Status {
        self.statuses.get(check).copied().unwrap_or(Status::Unknown)
    }

    pub fn tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn disclaim(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.disclaimers.contains(&text) {
            self.disclaimers.push(text);
        }
    }

    /// Worst status across all recorded sub-checks.
    pub fn worst(&self) -> Status {
        Status::worst_of(self.statuses.values().copied())
    }
}

/// One engine's finalized evaluation: derived values, per-sub-check flags,
/// the worst-of overall status, and the recommendations generated from the
/// finalized flags. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub domain: Domain,
    pub status: Status,
    pub values: BTreeMap<String, f64>,
    pub flags: Flags,
    pub recommendations: Vec<Recommendation>,
}

impl EngineResult {
    /// Finalize an engine evaluation. The overall status is always computed
    /// as the worst of the flag statuses; callers cannot supply their own.
    pub fn finalize(
        domain: Domain,
        values: BTreeMap<String, f64>,
        flags: Flags,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let status = flags.worst();
        Self {
            domain,
            status,
            values,
            flags,
            recommendations,
        }
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}
