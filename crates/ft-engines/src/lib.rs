//! ft-engines: the seven domain evaluation engines.
//!
//! Each engine turns one domain's raw measurements plus the equipment
//! profile into derived physical quantities, per-sub-check ordinal
//! statuses, and diagnostic recommendations. Engines share one skeleton:
//!
//! 1. Resolve expected ranges (manufacturer > nameplate-calculated >
//!    industry default, with a disclaimer on the industry fallback)
//! 2. Compute derived values from raw measurements
//! 3. Classify each value through a threshold ladder, with extreme-value
//!    short-circuits checked before any range-relative comparison
//! 4. Aggregate sub-check statuses worst-of into the engine status
//! 5. Generate recommendations from the finalized values/flags only
//!
//! Every engine is a pure function of its arguments; abnormal readings are
//! successful classifications, never errors.

pub mod airside;
pub mod common;
pub mod condenser;
pub mod hydronic;
pub mod reciprocating;
pub mod reversing_valve;
pub mod refrigeration;
pub mod scroll;
pub mod traits;

pub use airside::AirsideEngine;
pub use condenser::CondenserApproachEngine;
pub use hydronic::HydronicEngine;
pub use reciprocating::ReciprocatingCompressorEngine;
pub use reversing_valve::ReversingValveEngine;
pub use refrigeration::RefrigerationEngine;
pub use scroll::ScrollCompressorEngine;
pub use traits::{DiagnosticEngine, EngineValidation};
