//! Reliability analysis from fitted Weibull parameters.
//!
//! Provides reliability function, hazard rate, MTBF, B-life, marker lines
//! and plotting curves for common reliability engineering reports.

use std::iter::FusedIterator;

use serde::Serialize;
use u_numflow::special::gamma;

use super::mrr::WeibullMrrResult;
use crate::error::{Result, WeibullError};

/// Reliability analysis results from a fitted Weibull distribution.
///
/// Computes reliability engineering metrics (reliability function, hazard
/// rate, MTBF, B-life) from Weibull shape (beta) and scale (eta) parameters.
///
/// # Mathematical Background
///
/// Given a Weibull distribution with shape beta > 0 and scale eta > 0:
/// - Reliability: R(t) = exp(-(t/eta)^beta)
/// - Hazard rate: lambda(t) = (beta/eta) * (t/eta)^(beta-1)
/// - MTBF: eta * Gamma(1 + 1/beta)
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::ReliabilityAnalysis;
/// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
/// assert!((ra.reliability(0.0) - 1.0).abs() < 1e-10);
/// assert!(ra.hazard_rate(50.0) > 0.0);
/// assert!(ra.mtbf() > 0.0);
/// let b10 = ra.b_life(0.10).unwrap();
/// assert!(b10 > 0.0 && b10 < 100.0);
/// ```
///
/// # Reference
/// Meeker & Escobar (1998), *Statistical Methods for Reliability Data*, Wiley.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReliabilityAnalysis {
    /// Shape parameter (beta).
    shape: f64,
    /// Scale parameter (eta).
    scale: f64,
}

/// Life at a given percent failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BLife {
    /// Percent of the population failed, in (0, 100).
    pub percent_failed: f64,
    /// Life by which that percent has failed.
    pub life: f64,
}

/// A vertical marker at the life where reliability falls to a chosen level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityMarker {
    /// Reliability level in percent, in (0, 100).
    pub reliability_pct: f64,
    /// Life at which R(t) equals `reliability_pct / 100`.
    pub life: f64,
    /// B-life label, e.g. `B5` for 95% reliability.
    pub label: String,
}

impl ReliabilityAnalysis {
    /// Creates a new reliability analysis from Weibull parameters.
    ///
    /// # Returns
    /// `None` if either parameter is non-positive or non-finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// assert!(ReliabilityAnalysis::new(2.0, 100.0).is_some());
    /// assert!(ReliabilityAnalysis::new(-1.0, 100.0).is_none());
    /// assert!(ReliabilityAnalysis::new(2.0, 0.0).is_none());
    /// ```
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return None;
        }
        Some(Self { shape, scale })
    }

    /// Creates a reliability analysis from an MRR fitting result.
    ///
    /// MRR results always carry positive, finite parameters.
    pub fn from_mrr(result: &WeibullMrrResult) -> Self {
        Self {
            shape: result.shape,
            scale: result.scale,
        }
    }

    /// Returns the shape parameter (beta).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Returns the scale parameter (eta).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Reliability (survival) function at time t.
    ///
    /// ```text
    /// R(t) = exp(-(t/eta)^beta)
    /// ```
    ///
    /// For t <= 0, returns 1.0 (no failure before time 0).
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    ///
    /// // R(eta) = exp(-1) for any shape parameter
    /// let expected = (-1.0_f64).exp();
    /// assert!((ra.reliability(100.0) - expected).abs() < 1e-10);
    /// ```
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let z = t / self.scale;
        (-z.powf(self.shape)).exp()
    }

    /// Failure rate (hazard function) at time t.
    ///
    /// ```text
    /// lambda(t) = (beta/eta) * (t/eta)^(beta-1)
    /// ```
    ///
    /// For t <= 0, returns 0.0.
    pub fn hazard_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let z = t / self.scale;
        (self.shape / self.scale) * z.powf(self.shape - 1.0)
    }

    /// Mean Time Between Failures (MTBF).
    ///
    /// ```text
    /// MTBF = eta * Gamma(1 + 1/beta)
    /// ```
    ///
    /// # Reference
    /// Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate Distributions*,
    /// Vol. 1, Chapter 21.
    pub fn mtbf(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// Life at which reliability drops to `reliability`.
    ///
    /// Solves R(t) = p for t:
    ///
    /// ```text
    /// t = eta * (-ln(p))^(1/beta)
    /// ```
    ///
    /// # Errors
    /// [`WeibullError::InvalidReliability`] unless `0 < reliability < 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    /// let t = ra.quantile_life(0.9).unwrap();
    /// assert!((ra.reliability(t) - 0.9).abs() < 1e-12);
    /// assert!(ra.quantile_life(1.0).is_err());
    /// ```
    pub fn quantile_life(&self, reliability: f64) -> Result<f64> {
        if !(reliability > 0.0 && reliability < 1.0) {
            return Err(WeibullError::InvalidReliability { value: reliability });
        }
        Ok(self.scale * (-reliability.ln()).powf(1.0 / self.shape))
    }

    /// B-life: time at which a given fraction of the population has failed.
    ///
    /// B10 life (10% failed) = `b_life(0.10)`, which is equivalent to
    /// `quantile_life(0.90)`.
    ///
    /// # Errors
    /// [`WeibullError::InvalidReliability`] unless `0 < fraction_failed < 1`.
    ///
    /// # Reference
    /// Abernethy (2006), *The New Weibull Handbook*, 5th ed., Chapter 2.
    pub fn b_life(&self, fraction_failed: f64) -> Result<f64> {
        if !(fraction_failed > 0.0 && fraction_failed < 1.0) {
            return Err(WeibullError::InvalidReliability {
                value: 1.0 - fraction_failed,
            });
        }
        self.quantile_life(1.0 - fraction_failed)
    }

    /// B-lives for each percent-failed level, in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    /// let table = ra.b_life_table(&[1.0, 10.0, 50.0]).unwrap();
    /// assert_eq!(table.len(), 3);
    /// assert!(table[0].life < table[1].life && table[1].life < table[2].life);
    /// ```
    pub fn b_life_table(&self, percents_failed: &[f64]) -> Result<Vec<BLife>> {
        percents_failed
            .iter()
            .map(|&percent_failed| {
                Ok(BLife {
                    percent_failed,
                    life: self.b_life(percent_failed / 100.0)?,
                })
            })
            .collect()
    }

    /// Marker at the life where reliability equals `reliability_pct` percent.
    ///
    /// The label rounds the percent failed to a whole B-level in `1..=99`.
    ///
    /// # Errors
    /// [`WeibullError::InvalidReliability`] unless `0 < reliability_pct < 100`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::weibull::ReliabilityAnalysis;
    /// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
    /// let marker = ra.marker(90.0).unwrap();
    /// assert_eq!(marker.label, "B10");
    /// ```
    pub fn marker(&self, reliability_pct: f64) -> Result<ReliabilityMarker> {
        let life = self.quantile_life(reliability_pct / 100.0)?;
        Ok(ReliabilityMarker {
            reliability_pct,
            life,
            label: format!("B{}", (100.0 - reliability_pct).round().clamp(1.0, 99.0)),
        })
    }

    /// Uniformly sampled `(t, 100 * R(t))` pairs over `[0, horizon]`.
    ///
    /// # Returns
    /// `None` if `horizon` is negative or not finite.
    pub fn curve(&self, horizon: f64, resolution: usize) -> Option<ReliabilityCurve> {
        if !horizon.is_finite() || horizon < 0.0 {
            return None;
        }
        Some(ReliabilityCurve::spanning(*self, horizon, resolution))
    }
}

/// Lazy, finite sampling of a reliability curve for plotting.
///
/// Yields `resolution + 1` pairs `(t_k, 100 * R(t_k))` with
/// `t_k = horizon * k / resolution`; the first and last points sit exactly
/// at `0` and `horizon`. The resolution is clamped to `1..=usize::MAX - 1`
/// so the point count always fits in `usize`. Clone the iterator (or
/// request a new one) to restart it.
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::ReliabilityAnalysis;
/// let ra = ReliabilityAnalysis::new(2.0, 100.0).unwrap();
/// let curve = ra.curve(200.0, 4).unwrap();
/// let ts: Vec<f64> = curve.map(|(t, _)| t).collect();
/// assert_eq!(ts, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ReliabilityCurve {
    analysis: ReliabilityAnalysis,
    horizon: f64,
    resolution: usize,
    next: usize,
}

impl ReliabilityCurve {
    pub(crate) fn spanning(analysis: ReliabilityAnalysis, horizon: f64, resolution: usize) -> Self {
        Self {
            analysis,
            horizon,
            resolution: resolution.clamp(1, usize::MAX - 1),
            next: 0,
        }
    }

    /// Right edge of the sampled interval.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Number of intervals between samples.
    pub fn resolution(&self) -> usize {
        self.resolution
    }
}

impl Iterator for ReliabilityCurve {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.resolution {
            return None;
        }
        let t = self.horizon * (self.next as f64 / self.resolution as f64);
        self.next += 1;
        Some((t, self.analysis.reliability(t) * 100.0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.resolution + 1) - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ReliabilityCurve {}

impl FusedIterator for ReliabilityCurve {}
