//! Analysis configuration.
//!
//! [`AnalysisConfig`] gathers the tunable constants of a Weibull analysis.
//! It deserializes with serde (missing fields take their defaults) so a host
//! application can load it from its own settings file.
//!
//! ```
//! use u_reliability::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default()
//!     .with_marker_reliability_pct(90.0)
//!     .with_curve_resolution(100);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.marker_reliability_pct, 90.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeibullError};

/// Upper clamp applied to median ranks before the log-log transform.
pub const DEFAULT_RANK_CLAMP: f64 = 0.99999;

/// Scale improvement (percent) above which a comparison is "substantial".
pub const DEFAULT_SUBSTANTIAL_IMPROVEMENT_PCT: f64 = 10.0;

/// Number of intervals sampled along a reliability curve.
pub const DEFAULT_CURVE_RESOLUTION: usize = 200;

/// Reliability level (percent) of the B-life marker.
pub const DEFAULT_MARKER_RELIABILITY_PCT: f64 = 95.0;

/// Percent-failed levels reported in the B-life table.
pub const DEFAULT_B_LIFE_PERCENTS: [f64; 5] = [1.0, 5.0, 10.0, 20.0, 50.0];

/// Tunable parameters of a Weibull analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Median ranks are clamped to at most this value. Must lie in (0, 1).
    pub rank_clamp: f64,
    /// Threshold (percent) separating substantial from marginal improvement.
    pub substantial_improvement_pct: f64,
    /// Intervals along the plotted reliability curve.
    pub curve_resolution: usize,
    /// Reliability (percent, exclusive 0..100) at which the B-life marker sits.
    pub marker_reliability_pct: f64,
    /// Percent-failed levels (exclusive 0..100) for the B-life table.
    pub b_life_percents: Vec<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rank_clamp: DEFAULT_RANK_CLAMP,
            substantial_improvement_pct: DEFAULT_SUBSTANTIAL_IMPROVEMENT_PCT,
            curve_resolution: DEFAULT_CURVE_RESOLUTION,
            marker_reliability_pct: DEFAULT_MARKER_RELIABILITY_PCT,
            b_life_percents: DEFAULT_B_LIFE_PERCENTS.to_vec(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_rank_clamp(mut self, rank_clamp: f64) -> Self {
        self.rank_clamp = rank_clamp;
        self
    }

    pub fn with_substantial_improvement_pct(mut self, pct: f64) -> Self {
        self.substantial_improvement_pct = pct;
        self
    }

    pub fn with_curve_resolution(mut self, resolution: usize) -> Self {
        self.curve_resolution = resolution;
        self
    }

    pub fn with_marker_reliability_pct(mut self, pct: f64) -> Self {
        self.marker_reliability_pct = pct;
        self
    }

    pub fn with_b_life_percents(mut self, percents: impl Into<Vec<f64>>) -> Self {
        self.b_life_percents = percents.into();
        self
    }

    /// Checks every field against its admissible range.
    ///
    /// # Errors
    /// [`WeibullError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_rank_clamp(self.rank_clamp)?;
        if !self.substantial_improvement_pct.is_finite() {
            return Err(WeibullError::InvalidConfig {
                field: "substantial_improvement_pct",
                reason: "must be finite",
            });
        }
        if self.curve_resolution == 0 {
            return Err(WeibullError::InvalidConfig {
                field: "curve_resolution",
                reason: "must be at least 1",
            });
        }
        if !is_open_percent(self.marker_reliability_pct) {
            return Err(WeibullError::InvalidConfig {
                field: "marker_reliability_pct",
                reason: "must lie strictly between 0 and 100",
            });
        }
        if !self.b_life_percents.iter().all(|&p| is_open_percent(p)) {
            return Err(WeibullError::InvalidConfig {
                field: "b_life_percents",
                reason: "every entry must lie strictly between 0 and 100",
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_rank_clamp(rank_clamp: f64) -> Result<()> {
    if rank_clamp.is_finite() && rank_clamp > 0.0 && rank_clamp < 1.0 {
        Ok(())
    } else {
        Err(WeibullError::InvalidConfig {
            field: "rank_clamp",
            reason: "must lie strictly between 0 and 1",
        })
    }
}

fn is_open_percent(p: f64) -> bool {
    p.is_finite() && p > 0.0 && p < 100.0
}
