//! Shared engine contract.

use ft_core::{Domain, EngineResult};
use ft_profile::EquipmentProfile;

/// Outcome of an engine's lightweight structural check.
///
/// This is the engine's own sanity pass over its measurement group; the
/// heavier bundle-wide pre-validation lives in `ft-profile` and runs before
/// any engine is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineValidation {
    pub ok: bool,
    pub issues: Vec<String>,
}

impl EngineValidation {
    pub fn ok() -> Self {
        Self {
            ok: true,
            issues: Vec::new(),
        }
    }

    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// One domain engine. Pure and synchronous: `evaluate` never fails and
/// never mutates its inputs; a critical physical condition is a normal,
/// successful classification.
pub trait DiagnosticEngine {
    type Measurements;

    fn domain(&self) -> Domain;

    fn validate(&self, measurements: &Self::Measurements) -> EngineValidation;

    fn evaluate(
        &self,
        measurements: &Self::Measurements,
        profile: &EquipmentProfile,
    ) -> EngineResult;
}
