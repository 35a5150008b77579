//! Error taxonomy for Weibull analysis.
//!
//! Every variant is a local validation failure on the caller's data or
//! configuration. None of them is transient, so there is nothing to retry.

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, WeibullError>;

/// Errors produced while building samples, fitting, or deriving metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeibullError {
    /// Fewer than two exact failures; suspensions alone cannot anchor a fit.
    #[error("at least 2 failures are required for a fit, found {found}")]
    InsufficientFailures { found: usize },

    /// Fewer than two finite probability-plot points survived the log-log transform.
    #[error("only {points} finite probability-plot point(s) remain after the log-log transform")]
    DegenerateFit { points: usize },

    /// The least-squares problem has no unique, positive solution.
    #[error("singular regression: {reason}")]
    SingularRegression { reason: &'static str },

    /// A reliability level outside the open interval (0, 1).
    #[error("reliability must lie strictly between 0 and 1, got {value}")]
    InvalidReliability { value: f64 },

    /// Non-positive or non-finite lifetime, or an unknown status code.
    #[error("invalid observation: {reason}")]
    InvalidObservation { reason: String },

    /// A relative difference against a zero (or non-finite) base.
    #[error("division by zero: reference {quantity} is zero or not finite")]
    DivisionByZero { quantity: &'static str },

    /// A configuration value outside its admissible range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl WeibullError {
    pub(crate) fn observation(reason: impl Into<String>) -> Self {
        Self::InvalidObservation {
            reason: reason.into(),
        }
    }
}
