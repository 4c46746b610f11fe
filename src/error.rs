//! Crate-level error type.

use thiserror::Error;

use crate::algorithms::matching::MatchError;
use crate::config::ConfigError;
use crate::core::types::ScanError;

/// Errors reported by [`LaserOdometry`](crate::engine::LaserOdometry).
///
/// Every variant is per-cycle: the estimator stays usable after any of them.
#[derive(Error, Debug)]
pub enum OdometryError {
    /// `process` was called before `initialize`.
    #[error("Odometry not initialized")]
    NotInitialized,

    /// The scan could not be turned into a scan record.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Scan matching failed for this cycle.
    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl OdometryError {
    /// The match failure, if this is one.
    pub fn as_match_error(&self) -> Option<&MatchError> {
        match self {
            OdometryError::Match(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: OdometryError = MatchError::NumericalFault("singular").into();
        assert_eq!(err.to_string(), "Match error: Numerical fault: singular");
        assert!(err.as_match_error().is_some());

        let err: OdometryError = ScanError::BeamCountMismatch {
            expected: 360,
            actual: 359,
        }
        .into();
        assert!(matches!(err, OdometryError::Scan(_)));
        assert!(err.as_match_error().is_none());
    }
}
