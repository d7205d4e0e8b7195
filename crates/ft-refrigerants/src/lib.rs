//! ft-refrigerants: saturation pressure/temperature lookup for FieldTherm.
//!
//! Provides:
//! - A refrigerant catalog with alias-tolerant identity parsing
//! - Tabulated saturation curves (°F vs psig) for the common water-source
//!   heat-pump refrigerants
//! - Interpolating/extrapolating pressure → saturation-temperature lookup
//! - Curve selection rules for manually supplied PT overrides
//!
//! The tables are static and shared; every lookup is a pure function. This
//! crate deliberately stops at lookup and linear interpolation; it is not
//! an equation-of-state backend.

pub mod catalog;
pub mod curve;
pub mod select;
pub mod tables;

pub use catalog::{Refrigerant, RefrigerantCatalogEntry, refrigerant_catalog};
pub use curve::{SaturationCurve, SaturationLookup, fallback_saturation_temp};
pub use select::{CurveSelection, CurveSource};
