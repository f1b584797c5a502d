//! Error types for model construction and solving

use thiserror::Error;

/// Errors raised while building the model or running the solver
///
/// Construction errors are raised before any age is solved; there is no
/// partial output once one of them occurs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Grid bounds or point count cannot produce a strictly increasing grid
    #[error("invalid {grid} grid: {reason}")]
    InvalidGridSpec {
        grid: &'static str,
        reason: String,
    },

    /// AR(1) persistence outside the stationary region
    #[error("degenerate income process: |llambda_eps| = {} must be below 1", .persistence.abs())]
    DegenerateProcess { persistence: f64 },

    /// Scalar parameter outside its domain
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter {
        name: &'static str,
        value: String,
    },

    /// Cancellation flag observed before solving the given age
    #[error("solve cancelled before age {age}")]
    Cancelled { age: usize },
}

impl ModelError {
    pub(crate) fn grid(grid: &'static str, reason: impl Into<String>) -> Self {
        ModelError::InvalidGridSpec {
            grid,
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(name: &'static str, value: impl Into<String>) -> Self {
        ModelError::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::grid("asset", "nx = 1 must be at least 2");
        assert_eq!(err.to_string(), "invalid asset grid: nx = 1 must be at least 2");

        let err = ModelError::DegenerateProcess { persistence: -1.2 };
        assert!(err.to_string().contains("1.2"));

        let err = ModelError::parameter("ssigma_eps", "must be positive, got 0");
        assert!(err.to_string().contains("ssigma_eps"));

        let err = ModelError::Cancelled { age: 4 };
        assert_eq!(err.to_string(), "solve cancelled before age 4");
    }
}
