//! # u-reliability
//!
//! Weibull life-data analysis for mixed failure and suspension samples.
//!
//! This crate estimates two-parameter Weibull distributions by median rank
//! regression, with Johnson's rank adjustment for right-censored items. It
//! operates on plain values and keeps no state between calls.
//!
//! ## Modules
//!
//! - [`sample`] — Observations, ordered samples, batch text import
//! - [`weibull`] — Median ranks, MRR fit, reliability metrics, group comparison
//! - [`analysis`] — One-call fit with B-life table, marker and curve
//! - [`config`] — Tunable analysis constants
//! - [`error`] — Error taxonomy
//!
//! ## Example
//!
//! ```
//! use u_reliability::sample::Sample;
//! use u_reliability::weibull::weibull_mrr;
//!
//! let mut sample = Sample::new();
//! let report = sample.import_batch("100 F\n150 F\n200 F\n250 S\n300 F\n400 F\n550 F\n120 S");
//! assert_eq!(report.accepted, 8);
//!
//! let fit = weibull_mrr(&sample).unwrap();
//! let b10 = fit.reliability().b_life(0.10).unwrap();
//! assert!(b10 > 0.0 && b10 < fit.scale);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Domain-agnostic**: lifetimes are raw `f64` in any unit
//! - **No silent NaN**: every degenerate input surfaces as a [`WeibullError`]
//! - **Research-backed**: All algorithms reference academic literature

pub mod analysis;
pub mod config;
pub mod error;
pub mod sample;
pub mod weibull;

pub use error::{Result, WeibullError};
