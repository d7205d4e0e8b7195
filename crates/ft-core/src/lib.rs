//! ft-core: shared classification and result types for FieldTherm.
//!
//! Provides:
//! - Ordinal status classification (`Status`) and worst-of aggregation
//! - Expected operating ranges with source-of-truth provenance
//! - The canonical engine result shape (`EngineResult`, `Flags`)
//! - Schema-validated diagnostic recommendations
//!
//! Everything here is pure data plus small pure functions; no I/O.

pub mod range;
pub mod recommendation;
pub mod result;
pub mod status;

pub use range::{ExpectedRange, RangeDef, RangeSource, ResolvedRange, resolve_range};
pub use recommendation::{Intent, Recommendation, RecommendationError, Severity};
pub use result::{Domain, EngineResult, Flags};
pub use status::Status;
