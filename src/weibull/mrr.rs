//! Median Rank Regression (MRR) for Weibull parameter estimation.
//!
//! Fits Weibull parameters using least-squares regression on the
//! linearized Weibull probability plot. Right-censored observations are
//! handled through Johnson's adjusted ranks (see [`median_ranks`]).

use serde::Serialize;
use u_numflow::stats;

use super::ranks::median_ranks;
use super::reliability::{ReliabilityAnalysis, ReliabilityCurve};
use crate::config::{validate_rank_clamp, DEFAULT_RANK_CLAMP};
use crate::error::{Result, WeibullError};
use crate::sample::Sample;

/// Shapes below this indicate a decreasing failure rate.
pub const EARLY_LIFE_SHAPE_LIMIT: f64 = 1.0;

/// Shapes from [`EARLY_LIFE_SHAPE_LIMIT`] up to (excluding) this are treated
/// as a constant failure rate.
pub const RANDOM_SHAPE_LIMIT: f64 = 1.1;

/// Extension of the plotted fit line beyond the data, in ln(t) units.
pub const PLOT_LINE_MARGIN: f64 = 0.5;

/// Failure-mode classification by shape parameter.
///
/// - beta < 1: Decreasing failure rate (infant mortality)
/// - 1 <= beta < 1.1: Approximately constant failure rate (random)
/// - beta >= 1.1: Increasing failure rate (wear-out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureMode {
    EarlyLife,
    Random,
    WearOut,
}

impl FailureMode {
    /// Classifies a fitted shape parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::FailureMode;
    /// assert_eq!(FailureMode::from_shape(0.7), FailureMode::EarlyLife);
    /// assert_eq!(FailureMode::from_shape(1.0), FailureMode::Random);
    /// assert_eq!(FailureMode::from_shape(1.1), FailureMode::WearOut);
    /// ```
    pub fn from_shape(shape: f64) -> Self {
        if shape < EARLY_LIFE_SHAPE_LIMIT {
            FailureMode::EarlyLife
        } else if shape < RANDOM_SHAPE_LIMIT {
            FailureMode::Random
        } else {
            FailureMode::WearOut
        }
    }

    /// Short English description.
    pub fn description(self) -> &'static str {
        match self {
            FailureMode::EarlyLife => "early-life (infant mortality)",
            FailureMode::Random => "random (constant rate)",
            FailureMode::WearOut => "wear-out",
        }
    }
}

/// One point of the Weibull probability plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitPoint {
    /// ln(t)
    pub x: f64,
    /// ln(-ln(1 - F))
    pub y: f64,
}

/// Ordinary least-squares line y = intercept + slope * x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

/// Result of Weibull MRR fitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeibullMrrResult {
    /// Shape parameter (beta).
    pub shape: f64,
    /// Scale parameter (eta).
    pub scale: f64,
    /// Coefficient of determination (R-squared) measuring goodness of fit.
    pub r_squared: f64,
    /// Classification of `shape`.
    pub failure_mode: FailureMode,
    /// Probability-plot points, one per failure, in sample order.
    pub points: Vec<FitPoint>,
    /// Regression slope (equal to `shape`).
    pub slope: f64,
    /// Regression intercept (`-shape * ln(scale)`).
    pub intercept: f64,
    /// Largest lifetime in the sample, suspensions included.
    pub max_lifetime: f64,
    /// Number of failures in the sample.
    pub failures: usize,
    /// Number of suspensions in the sample.
    pub suspensions: usize,
}

impl WeibullMrrResult {
    /// Reliability metrics for the fitted parameters.
    pub fn reliability(&self) -> ReliabilityAnalysis {
        ReliabilityAnalysis::from_mrr(self)
    }

    /// Right edge of the plotted reliability curve:
    /// `max(2.2 * eta, 1.5 * max_lifetime)`.
    pub fn curve_horizon(&self) -> f64 {
        (2.2 * self.scale).max(1.5 * self.max_lifetime)
    }

    /// Samples `(t, 100 * R(t))` uniformly over `[0, curve_horizon()]`.
    ///
    /// See [`ReliabilityCurve`].
    pub fn reliability_curve(&self, resolution: usize) -> ReliabilityCurve {
        ReliabilityCurve::spanning(self.reliability(), self.curve_horizon(), resolution)
    }

    /// End points of the fitted line across the plotted x range, widened by
    /// [`PLOT_LINE_MARGIN`] on both sides.
    pub fn fitted_line(&self) -> [FitPoint; 2] {
        let (min_x, max_x) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        let at = |x: f64| FitPoint {
            x,
            y: self.slope * x + self.intercept,
        };
        [at(min_x - PLOT_LINE_MARGIN), at(max_x + PLOT_LINE_MARGIN)]
    }
}

/// Transforms every failure into probability-plot coordinates.
///
/// Points whose coordinates are not finite are dropped.
pub fn probability_plot(sample: &Sample, rank_clamp: f64) -> Vec<FitPoint> {
    median_ranks(sample, rank_clamp)
        .into_iter()
        .filter_map(|rank| {
            let x = rank.lifetime.ln();
            let y = (-(1.0 - rank.median_rank).ln()).ln(); // ln(-ln(1 - F_i))
            (x.is_finite() && y.is_finite()).then_some(FitPoint { x, y })
        })
        .collect()
}

/// Least-squares fit of y on x.
///
/// # Errors
/// - [`WeibullError::DegenerateFit`] for fewer than 2 points.
/// - [`WeibullError::SingularRegression`] if every x is identical, or if
///   the total sum of squares vanishes while residuals do not.
pub fn least_squares(points: &[FitPoint]) -> Result<LineFit> {
    let n = points.len();
    if n < 2 {
        return Err(WeibullError::DegenerateFit { points: n });
    }

    let x_vals: Vec<f64> = points.iter().map(|p| p.x).collect();
    let y_vals: Vec<f64> = points.iter().map(|p| p.y).collect();

    if x_vals.iter().all(|&x| x == x_vals[0]) {
        return Err(WeibullError::SingularRegression {
            reason: "all failure lifetimes are identical",
        });
    }
    if y_vals.iter().all(|&y| y == y_vals[0]) {
        // Horizontal line through every point.
        return Ok(LineFit {
            slope: 0.0,
            intercept: y_vals[0],
            r_squared: 1.0,
        });
    }

    let degenerate = WeibullError::DegenerateFit { points: n };
    let mean_x = stats::mean(&x_vals).ok_or_else(|| degenerate.clone())?;
    let mean_y = stats::mean(&y_vals).ok_or(degenerate)?;

    // Mean-centred sums; algebraically equal to
    // b = (n*sum(xy) - sum(x)*sum(y)) / (n*sum(x^2) - sum(x)^2).
    let (sxx, sxy) = x_vals
        .iter()
        .zip(y_vals.iter())
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
    if sxx <= 0.0 {
        return Err(WeibullError::SingularRegression {
            reason: "zero variance in ln(lifetime)",
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = y_vals.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = x_vals
        .iter()
        .zip(y_vals.iter())
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            return Err(WeibullError::SingularRegression {
                reason: "total sum of squares is zero",
            });
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Fit a Weibull distribution using Median Rank Regression.
///
/// Uses [`DEFAULT_RANK_CLAMP`]; see [`weibull_mrr_with`].
///
/// # Examples
///
/// ```
/// use u_reliability::sample::{parse_batch, Sample};
/// use u_reliability::weibull::{weibull_mrr, FailureMode};
///
/// let sample: Sample = parse_batch(
///     "100 F\n150 F\n200 F\n250 S\n300 F\n400 F\n550 F\n120 S",
/// )
/// .observations
/// .into_iter()
/// .collect();
/// let result = weibull_mrr(&sample).unwrap();
/// assert!(result.shape > 0.0);
/// assert!(result.scale > 0.0);
/// assert_eq!(result.failure_mode, FailureMode::WearOut);
/// assert_eq!(result.points.len(), 6);
/// ```
pub fn weibull_mrr(sample: &Sample) -> Result<WeibullMrrResult> {
    weibull_mrr_with(sample, DEFAULT_RANK_CLAMP)
}

/// Fit a Weibull distribution using Median Rank Regression with an explicit
/// median-rank clamp.
///
/// The linearized Weibull CDF is:
///
/// ```text
/// ln(-ln(1 - F(t))) = beta * ln(t) - beta * ln(eta)
/// ```
///
/// Plotting y = ln(-ln(1 - F_i)) vs x = ln(t_i) gives a line with
/// slope beta and intercept -beta * ln(eta).
///
/// # Algorithm
/// 1. Take the sample in sorted order (ascending, failures first on ties)
/// 2. Compute adjusted median ranks F_i for each failure
/// 3. Transform: x_i = ln(t_i), y_i = ln(-ln(1 - F_i))
/// 4. Fit line y = a + b*x using ordinary least squares
/// 5. beta = b, eta = exp(-a/b)
///
/// # Errors
/// - [`WeibullError::InvalidConfig`] if `rank_clamp` is not in (0, 1)
/// - [`WeibullError::InsufficientFailures`] for fewer than 2 failures
/// - [`WeibullError::DegenerateFit`] for fewer than 2 finite plot points
/// - [`WeibullError::SingularRegression`] if the regression has no
///   positive, finite solution
///
/// # Reference
/// Abernethy (2006), *The New Weibull Handbook*, 5th ed.
pub fn weibull_mrr_with(sample: &Sample, rank_clamp: f64) -> Result<WeibullMrrResult> {
    validate_rank_clamp(rank_clamp)?;

    let failures = sample.failure_count();
    if failures < 2 {
        return Err(WeibullError::InsufficientFailures { found: failures });
    }
    let max_lifetime = sample
        .max_lifetime()
        .ok_or(WeibullError::InsufficientFailures { found: failures })?;

    let points = probability_plot(sample, rank_clamp);
    let line = least_squares(&points)?;

    let shape = line.slope;
    if !shape.is_finite() || shape <= 0.0 {
        return Err(WeibullError::SingularRegression {
            reason: "fitted slope is not positive",
        });
    }

    let scale = (-line.intercept / shape).exp();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(WeibullError::SingularRegression {
            reason: "fitted scale is not a positive finite number",
        });
    }

    tracing::debug!(
        failures,
        suspensions = sample.len() - failures,
        points = points.len(),
        shape,
        scale,
        r_squared = line.r_squared,
        "weibull mrr fit"
    );

    Ok(WeibullMrrResult {
        shape,
        scale,
        r_squared: line.r_squared,
        failure_mode: FailureMode::from_shape(shape),
        points,
        slope: line.slope,
        intercept: line.intercept,
        max_lifetime,
        failures,
        suspensions: sample.len() - failures,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sample::{Observation, Status};
    use proptest::prelude::*;

    /// Samples with integral lifetimes and at least two distinct failure times.
    fn censored_sample() -> impl Strategy<Value = Sample> {
        proptest::collection::vec((1u32..5000, any::<bool>()), 2..40)
            .prop_map(|entries| {
                entries
                    .into_iter()
                    .map(|(t, censored)| {
                        let status = if censored { Status::Suspended } else { Status::Failure };
                        Observation::new(t as f64, status).expect("positive lifetime")
                    })
                    .collect::<Sample>()
            })
            .prop_filter("at least two distinct failure lifetimes", |sample| {
                let mut failures = sample.iter().filter(|o| o.is_failure()).map(|o| o.lifetime());
                match failures.next() {
                    Some(first) => failures.any(|t| t != first),
                    None => false,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn fit_parameters_positive(sample in censored_sample()) {
            let result = weibull_mrr(&sample).unwrap();
            prop_assert!(result.shape.is_finite() && result.shape > 0.0, "shape = {}", result.shape);
            prop_assert!(result.scale.is_finite() && result.scale > 0.0, "scale = {}", result.scale);
            prop_assert!(result.r_squared <= 1.0 + 1e-12, "R^2 = {}", result.r_squared);
        }

        #[test]
        fn fit_scale_invariance(sample in censored_sample(), k in 0.01_f64..100.0) {
            let base = weibull_mrr(&sample).unwrap();
            let scaled = weibull_mrr(&sample.scaled(k).unwrap()).unwrap();
            prop_assert!(
                (scaled.shape - base.shape).abs() <= 1e-8 * base.shape,
                "shape {} vs {}", scaled.shape, base.shape
            );
            prop_assert!(
                (scaled.scale - k * base.scale).abs() <= 1e-8 * k * base.scale,
                "scale {} vs {}", scaled.scale, k * base.scale
            );
            prop_assert!((scaled.r_squared - base.r_squared).abs() <= 1e-8);
        }

        #[test]
        fn fewer_than_two_failures_rejected(
            failure in proptest::option::of(1u32..5000),
            suspensions in proptest::collection::vec(1u32..5000, 0..20),
        ) {
            let mut sample: Sample = suspensions
                .iter()
                .map(|&t| Observation::suspension(t as f64).unwrap())
                .collect();
            if let Some(t) = failure {
                sample.push(Observation::failure(t as f64).unwrap());
            }
            let found = sample.failure_count();
            prop_assert_eq!(
                weibull_mrr(&sample),
                Err(WeibullError::InsufficientFailures { found })
            );
        }

        #[test]
        fn uncensored_median_ranks_are_bernard(n in 2usize..60) {
            let sample: Sample = (1..=n)
                .map(|i| Observation::failure(i as f64).unwrap())
                .collect();
            let ranks = median_ranks(&sample, DEFAULT_RANK_CLAMP);
            for (i, rank) in ranks.iter().enumerate() {
                let expected = ((i + 1) as f64 - 0.3) / (n as f64 + 0.4);
                prop_assert_eq!(rank.median_rank, expected);
            }
        }
    }
}
