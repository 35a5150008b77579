//! Median ranks for censored samples.
//!
//! Suspensions carry no failure time, but they do shrink the population at
//! risk. Johnson's adjusted order numbers account for this: every item,
//! failure or suspension, consumes one reverse-rank position, and each
//! failure advances the running order number by an increment scaled to the
//! items still on test. A suspension ahead of a failure therefore enlarges
//! that failure's increment.
//!
//! ```text
//! reverse_rank_i = N - i                                    i = 0-based sorted index
//! increment_i    = ((N + 1) - O_prev) / (1 + reverse_rank_i)
//! O_i            = O_prev + increment_i                     failures only
//! F_i            = (O_i - 0.3) / (N + 0.4)                  Bernard's approximation
//! ```
//!
//! With no suspensions `O_i = i + 1`, and the median ranks reduce exactly to
//! the uncensored Bernard formula.
//!
//! # Reference
//! Johnson, L.G. (1964). *The Statistical Treatment of Fatigue Experiments*.
//! Elsevier.

use serde::Serialize;

use crate::sample::Sample;

/// Median-rank estimate for one failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankPoint {
    /// Position of the failure within the sorted sample (0-based).
    pub index: usize,
    /// Failure time.
    pub lifetime: f64,
    /// Johnson's adjusted (mean) order number.
    pub adjusted_rank: f64,
    /// Bernard median rank, after clamping.
    pub median_rank: f64,
}

/// Computes adjusted ranks and median ranks for every failure in `sample`.
///
/// Median ranks are clamped to at most `rank_clamp` so that `ln(1 - F)`
/// stays finite. The caller validates `rank_clamp`.
///
/// These are textbook Johnson ranks. Tools that advance the order number at
/// suspensions too, or divide by the reverse rank alone, report different
/// shape and scale estimates for censored samples.
///
/// # Examples
///
/// ```
/// use u_reliability::sample::{Observation, Sample};
/// use u_reliability::weibull::median_ranks;
///
/// let sample = Sample::from_observations([
///     Observation::failure(10.0).unwrap(),
///     Observation::suspension(15.0).unwrap(),
///     Observation::failure(20.0).unwrap(),
/// ]);
/// let ranks = median_ranks(&sample, 0.99999);
/// assert_eq!(ranks.len(), 2);
/// assert!((ranks[0].adjusted_rank - 1.0).abs() < 1e-12);
/// // The suspension pushes the second failure past order number 2.
/// assert!((ranks[1].adjusted_rank - 2.5).abs() < 1e-12);
/// ```
pub fn median_ranks(sample: &Sample, rank_clamp: f64) -> Vec<RankPoint> {
    let n = sample.len();
    let n_f = n as f64;
    let mut ranks = Vec::with_capacity(sample.failure_count());
    let mut previous_order = 0.0_f64;

    for (i, observation) in sample.iter().enumerate() {
        if observation.is_censored() {
            continue;
        }

        let reverse_rank = (n - i) as f64;
        let increment = ((n_f + 1.0) - previous_order) / (1.0 + reverse_rank);
        let current_order = previous_order + increment;

        let raw = (current_order - 0.3) / (n_f + 0.4);
        let median_rank = if raw > rank_clamp {
            tracing::trace!(index = i, raw, rank_clamp, "median rank clamped");
            rank_clamp
        } else {
            raw
        };

        ranks.push(RankPoint {
            index: i,
            lifetime: observation.lifetime(),
            adjusted_rank: current_order,
            median_rank,
        });
        previous_order = current_order;
    }

    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Observation, Status};

    const CLAMP: f64 = 0.99999;

    fn sample(data: &[(f64, Status)]) -> Sample {
        Sample::from_observations(
            data.iter()
                .map(|&(t, s)| Observation::new(t, s).expect("valid observation")),
        )
    }

    #[test]
    fn test_uncensored_reduces_to_bernard() {
        let data: Vec<(f64, Status)> = (1..=10).map(|i| (i as f64 * 10.0, Status::Failure)).collect();
        let ranks = median_ranks(&sample(&data), CLAMP);
        assert_eq!(ranks.len(), 10);
        for (i, rank) in ranks.iter().enumerate() {
            let expected = ((i + 1) as f64 - 0.3) / (10.0 + 0.4);
            assert_eq!(rank.adjusted_rank, (i + 1) as f64, "order number at {i}");
            assert_eq!(rank.median_rank, expected, "median rank at {i}");
        }
    }

    #[test]
    fn test_median_ranks_strictly_increase() {
        let data = [
            (100.0, Status::Failure),
            (120.0, Status::Suspended),
            (150.0, Status::Failure),
            (200.0, Status::Failure),
            (250.0, Status::Suspended),
            (300.0, Status::Failure),
        ];
        let ranks = median_ranks(&sample(&data), CLAMP);
        for pair in ranks.windows(2) {
            assert!(
                pair[1].median_rank > pair[0].median_rank,
                "median ranks must increase: {} then {}",
                pair[0].median_rank,
                pair[1].median_rank
            );
        }
    }

    #[test]
    fn test_johnson_hand_computed() {
        // Sorted: F100 S120 F150 F200 S250 F300 F400 F550, N = 8.
        let data = [
            (100.0, Status::Failure),
            (150.0, Status::Failure),
            (200.0, Status::Failure),
            (250.0, Status::Suspended),
            (300.0, Status::Failure),
            (400.0, Status::Failure),
            (550.0, Status::Failure),
            (120.0, Status::Suspended),
        ];
        let ranks = median_ranks(&sample(&data), CLAMP);

        let expected_orders = [
            1.0,
            15.0 / 7.0,
            23.0 / 7.0,
            33.0 / 7.0,
            43.0 / 7.0,
            53.0 / 7.0,
        ];
        assert_eq!(ranks.len(), expected_orders.len());
        for (rank, want) in ranks.iter().zip(expected_orders.iter()) {
            assert!(
                (rank.adjusted_rank - want).abs() < 1e-12,
                "order {} vs {}",
                rank.adjusted_rank,
                want
            );
            let median = (want - 0.3) / 8.4;
            assert!((rank.median_rank - median).abs() < 1e-12);
        }
        let indices: Vec<usize> = ranks.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn test_suspension_enlarges_later_increment() {
        let uncensored = median_ranks(
            &sample(&[(10.0, Status::Failure), (20.0, Status::Failure), (30.0, Status::Failure)]),
            CLAMP,
        );
        let censored = median_ranks(
            &sample(&[(10.0, Status::Failure), (15.0, Status::Suspended), (30.0, Status::Failure)]),
            CLAMP,
        );
        assert!(censored[1].adjusted_rank > uncensored[1].adjusted_rank);
    }

    #[test]
    fn test_suspensions_do_not_produce_points() {
        let data = [(10.0, Status::Suspended), (20.0, Status::Suspended)];
        assert!(median_ranks(&sample(&data), CLAMP).is_empty());
    }

    #[test]
    fn test_clamp_caps_median_rank() {
        let data = [(10.0, Status::Failure), (20.0, Status::Failure)];
        let ranks = median_ranks(&sample(&data), 0.5);
        assert!((ranks[0].median_rank - 0.7 / 2.4).abs() < 1e-15);
        assert_eq!(ranks[1].median_rank, 0.5);
    }
}
