//! One-call analysis of a sample, or of a baseline against a candidate group.
//!
//! Bundles the fit with the derived quantities a report needs: MTBF, the
//! B-life table, the reliability marker and a sampled reliability curve.
//! All tunables come from [`AnalysisConfig`].
//!
//! ```
//! use u_reliability::analysis::analyze_pair;
//! use u_reliability::config::AnalysisConfig;
//! use u_reliability::sample::Sample;
//! use u_reliability::weibull::Verdict;
//!
//! let mut baseline = Sample::new();
//! baseline.import_batch("450 F\n580 F\n690 F\n780 F\n870 F\n950 F\n1080 F\n1250 S\n1350 S");
//! let mut candidate = Sample::new();
//! candidate.import_batch("750 F\n880 F\n990 F\n1120 F\n1250 F\n1400 F\n1550 F\n1800 S\n2000 S");
//!
//! let report = analyze_pair(&baseline, &candidate, &AnalysisConfig::default()).unwrap();
//! let comparison = report.comparison.unwrap();
//! assert!(comparison.scale_delta_pct > 10.0);
//! assert_eq!(comparison.verdict, Verdict::SubstantialImprovement);
//! ```

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::sample::Sample;
use crate::weibull::{
    compare_with_threshold, weibull_mrr_with, BLife, GroupComparison, ReliabilityMarker,
    WeibullMrrResult,
};

/// Fit and derived metrics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    pub fit: WeibullMrrResult,
    /// Mean life, eta * Gamma(1 + 1/beta).
    pub mtbf: f64,
    /// B-lives at the configured percent-failed levels.
    pub b_lives: Vec<BLife>,
    /// Marker at the configured reliability level.
    pub marker: ReliabilityMarker,
    /// `(t, 100 * R(t))` at the configured curve resolution.
    pub curve: Vec<(f64, f64)>,
}

/// Reports for a baseline (A) and candidate (B) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairReport {
    /// `None` if group A could not be fitted.
    pub group_a: Option<GroupReport>,
    /// `None` if group B could not be fitted.
    pub group_b: Option<GroupReport>,
    /// Present only when both groups were fitted.
    pub comparison: Option<GroupComparison>,
}

/// Fits `sample` and derives its report.
///
/// # Errors
/// Any configuration or fitting error; see
/// [`weibull_mrr_with`](crate::weibull::weibull_mrr_with).
pub fn analyze(sample: &Sample, config: &AnalysisConfig) -> Result<GroupReport> {
    config.validate()?;
    analyze_validated(sample, config)
}

/// Analyzes both groups and compares B against A.
///
/// A group that cannot be fitted is left out of the report rather than
/// failing the whole run.
///
/// # Errors
/// Invalid configuration, or group A's error when neither group fits.
pub fn analyze_pair(a: &Sample, b: &Sample, config: &AnalysisConfig) -> Result<PairReport> {
    config.validate()?;

    let (group_a, group_b) = match (analyze_validated(a, config), analyze_validated(b, config)) {
        (Err(err), Err(_)) => return Err(err),
        (report_a, report_b) => (keep("A", report_a), keep("B", report_b)),
    };

    let comparison = match (&group_a, &group_b) {
        (Some(report_a), Some(report_b)) => Some(compare_with_threshold(
            &report_a.fit,
            &report_b.fit,
            config.substantial_improvement_pct,
        )?),
        _ => None,
    };

    Ok(PairReport {
        group_a,
        group_b,
        comparison,
    })
}

fn analyze_validated(sample: &Sample, config: &AnalysisConfig) -> Result<GroupReport> {
    let fit = weibull_mrr_with(sample, config.rank_clamp)?;
    let reliability = fit.reliability();
    let b_lives = reliability.b_life_table(&config.b_life_percents)?;
    let marker = reliability.marker(config.marker_reliability_pct)?;
    let curve = fit.reliability_curve(config.curve_resolution).collect();

    Ok(GroupReport {
        mtbf: reliability.mtbf(),
        fit,
        b_lives,
        marker,
        curve,
    })
}

fn keep(group: &'static str, report: Result<GroupReport>) -> Option<GroupReport> {
    match report {
        Ok(report) => Some(report),
        Err(error) => {
            tracing::warn!(group, %error, "group excluded from comparison");
            None
        }
    }
}
