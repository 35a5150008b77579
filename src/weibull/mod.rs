//! Weibull parameter estimation and reliability analysis.
//!
//! Provides median rank regression (MRR) for fitting Weibull distributions
//! to failure data with right-censored suspensions, reliability metrics from
//! the fitted parameters, and a two-group comparison.
//!
//! # Modules
//!
//! - [`median_ranks`] — Johnson's adjusted ranks with Bernard's approximation
//! - [`weibull_mrr`] — Median Rank Regression on the linearized probability plot
//! - [`ReliabilityAnalysis`] — R(t), hazard rate, MTBF, B-life from fitted parameters
//! - [`compare()`] — Relative shape/scale change between two fits
//!
//! # References
//!
//! - Abernethy, R.B. (2006). *The New Weibull Handbook*, 5th ed.
//! - Dodson, B. (2006). *The Weibull Analysis Handbook*, 2nd ed.

mod compare;
mod mrr;
mod ranks;
mod reliability;

pub use compare::{compare, compare_parameters, compare_with_threshold, GroupComparison, Verdict};
pub use mrr::{
    least_squares, probability_plot, weibull_mrr, weibull_mrr_with, FailureMode, FitPoint,
    LineFit, WeibullMrrResult, EARLY_LIFE_SHAPE_LIMIT, PLOT_LINE_MARGIN, RANDOM_SHAPE_LIMIT,
};
pub use ranks::{median_ranks, RankPoint};
pub use reliability::{BLife, ReliabilityAnalysis, ReliabilityCurve, ReliabilityMarker};
