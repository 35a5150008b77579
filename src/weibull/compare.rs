//! Two-group comparison of independent Weibull fits.
//!
//! Relative differences are taken against group A (the baseline):
//!
//! ```text
//! shape_delta_pct = (beta_b - beta_a) / beta_a * 100
//! scale_delta_pct = (eta_b  - eta_a)  / eta_a  * 100
//! ```
//!
//! The percentage base differs between (A, B) and (B, A), so swapping the
//! groups does not simply negate the deltas.

use serde::Serialize;

use super::mrr::WeibullMrrResult;
use crate::config::DEFAULT_SUBSTANTIAL_IMPROVEMENT_PCT;
use crate::error::{Result, WeibullError};

/// Qualitative reading of the characteristic-life change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// Scale improved by more than the substantial threshold.
    SubstantialImprovement,
    /// Scale improved, but not beyond the threshold.
    MarginalImprovement,
    /// No improvement, or a regression.
    Inconclusive,
}

impl Verdict {
    /// Three-tier classification of a scale change in percent.
    pub fn from_scale_delta(scale_delta_pct: f64, substantial_pct: f64) -> Self {
        if scale_delta_pct > substantial_pct {
            Verdict::SubstantialImprovement
        } else if scale_delta_pct > 0.0 {
            Verdict::MarginalImprovement
        } else {
            Verdict::Inconclusive
        }
    }
}

/// Relative change of group B against baseline group A.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupComparison {
    /// Percent change in shape (beta).
    pub shape_delta_pct: f64,
    /// Percent change in scale (eta).
    pub scale_delta_pct: f64,
    pub verdict: Verdict,
}

/// Compares two fits with the default substantial-improvement threshold.
///
/// # Examples
///
/// ```
/// use u_reliability::sample::Sample;
/// use u_reliability::weibull::{compare, weibull_mrr, Verdict};
///
/// let mut baseline = Sample::new();
/// baseline.import_batch("100 F\n150 F\n200 F\n300 F\n400 F");
/// let improved = baseline.scaled(1.2).unwrap();
///
/// let cmp = compare(&weibull_mrr(&baseline).unwrap(), &weibull_mrr(&improved).unwrap()).unwrap();
/// assert!((cmp.scale_delta_pct - 20.0).abs() < 1e-9);
/// assert!(cmp.shape_delta_pct.abs() < 1e-9);
/// assert_eq!(cmp.verdict, Verdict::SubstantialImprovement);
/// ```
pub fn compare(a: &WeibullMrrResult, b: &WeibullMrrResult) -> Result<GroupComparison> {
    compare_with_threshold(a, b, DEFAULT_SUBSTANTIAL_IMPROVEMENT_PCT)
}

/// Compares two fits with an explicit substantial-improvement threshold (percent).
///
/// # Errors
/// See [`compare_parameters`].
pub fn compare_with_threshold(
    a: &WeibullMrrResult,
    b: &WeibullMrrResult,
    substantial_pct: f64,
) -> Result<GroupComparison> {
    compare_parameters((a.shape, a.scale), (b.shape, b.scale), substantial_pct)
}

/// Compares raw `(shape, scale)` pairs.
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::{compare_parameters, Verdict};
///
/// let cmp = compare_parameters((2.0, 1000.0), (2.5, 1200.0), 10.0).unwrap();
/// assert!((cmp.scale_delta_pct - 20.0).abs() < 1e-12);
/// assert!((cmp.shape_delta_pct - 25.0).abs() < 1e-12);
/// assert_eq!(cmp.verdict, Verdict::SubstantialImprovement);
/// ```
///
/// # Errors
/// - [`WeibullError::DivisionByZero`] if a baseline parameter is zero or not
///   finite.
/// - [`WeibullError::InvalidObservation`] if a candidate parameter is not
///   finite.
/// - [`WeibullError::InvalidConfig`] if `substantial_pct` is not finite.
pub fn compare_parameters(
    (a_shape, a_scale): (f64, f64),
    (b_shape, b_scale): (f64, f64),
    substantial_pct: f64,
) -> Result<GroupComparison> {
    if !substantial_pct.is_finite() {
        return Err(WeibullError::InvalidConfig {
            field: "substantial_improvement_pct",
            reason: "must be finite",
        });
    }

    if !b_shape.is_finite() || !b_scale.is_finite() {
        return Err(WeibullError::observation(
            "candidate parameters must be finite",
        ));
    }

    let shape_delta_pct = relative_change_pct(a_shape, b_shape, "baseline shape")?;
    let scale_delta_pct = relative_change_pct(a_scale, b_scale, "baseline scale")?;

    Ok(GroupComparison {
        shape_delta_pct,
        scale_delta_pct,
        verdict: Verdict::from_scale_delta(scale_delta_pct, substantial_pct),
    })
}

fn relative_change_pct(base: f64, value: f64, quantity: &'static str) -> Result<f64> {
    if base == 0.0 || !base.is_finite() {
        return Err(WeibullError::DivisionByZero { quantity });
    }
    let pct = (value - base) / base * 100.0;
    if !pct.is_finite() {
        return Err(WeibullError::DivisionByZero { quantity });
    }
    Ok(pct)
}
