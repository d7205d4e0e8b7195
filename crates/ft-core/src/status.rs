//! Ordinal status classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of classifying one sub-check.
///
/// Ordered by severity for worst-of aggregation. `Unknown` sorts below `Ok`
/// so that a sub-check with insufficient data never masks a computed
/// abnormal status elsewhere in the same engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Unknown,
    Ok,
    Warning,
    Alert,
    Critical,
}

impl Status {
    /// Worst (highest-severity) status of an iterator, or `Unknown` when empty.
    pub fn worst_of<I: IntoIterator<Item = Status>>(statuses: I) -> Status {
        statuses
            .into_iter()
            .fold(Status::Unknown, |acc, s| acc.max(s))
    }

    /// True for `Alert` or `Critical`.
    pub fn is_abnormal(self) -> bool {
        matches!(self, Status::Alert | Status::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Ok => "ok",
            Status::Warning => "warning",
            Status::Alert => "alert",
            Status::Critical => "critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_severity() {
        assert!(Status::Unknown < Status::Ok);
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Alert);
        assert!(Status::Alert < Status::Critical);
    }

    #[test]
    fn worst_of_picks_highest() {
        let worst = Status::worst_of([Status::Ok, Status::Critical, Status::Warning]);
        assert_eq!(worst, Status::Critical);
    }

    #[test]
    fn unknown_never_masks_abnormal() {
        let worst = Status::worst_of([Status::Unknown, Status::Alert]);
        assert_eq!(worst, Status::Alert);
    }

    #[test]
    fn worst_of_empty_is_unknown() {
        assert_eq!(Status::worst_of([]), Status::Unknown);
    }
}
