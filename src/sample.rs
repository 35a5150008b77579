//! Life-data samples: exact failures mixed with right-censored suspensions.
//!
//! A [`Sample`] keeps its observations sorted ascending by lifetime, with
//! failures placed before suspensions at the same lifetime. Rank adjustment
//! depends on that order, so it is maintained on every mutation rather than
//! at fit time.
//!
//! # Batch import
//!
//! [`parse_batch`] reads one observation per line. Tokens are separated by
//! runs of commas, tabs or whitespace; the first token is the lifetime and
//! the second the status code (`F` failure, `S` suspended, case-insensitive).
//! Malformed lines are collected, never fatal.
//!
//! ```
//! use u_reliability::sample::{parse_batch, Sample};
//!
//! let batch = parse_batch("100, F\n250\tS\nbogus line\n150 f");
//! assert_eq!(batch.observations.len(), 3);
//! assert_eq!(batch.rejected.len(), 1);
//! assert_eq!(batch.rejected[0].line, 3);
//!
//! let sample: Sample = batch.observations.into_iter().collect();
//! assert_eq!(sample.failure_count(), 2);
//! assert_eq!(sample.max_lifetime(), Some(250.0));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeibullError};

/// Whether an item failed or was withdrawn (suspended) before failing.
///
/// Variant order is the tie-break order within a sample: failures sort
/// before suspensions at equal lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Exact failure time.
    Failure,
    /// Right-censored: survived at least to the recorded lifetime.
    Suspended,
}

impl Status {
    /// Single-letter code used by the batch import format.
    pub fn code(self) -> char {
        match self {
            Status::Failure => 'F',
            Status::Suspended => 'S',
        }
    }

    /// `true` for suspensions.
    pub fn is_censored(self) -> bool {
        self == Status::Suspended
    }
}

impl FromStr for Status {
    type Err = WeibullError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("F") {
            Ok(Status::Failure)
        } else if s.eq_ignore_ascii_case("S") {
            Ok(Status::Suspended)
        } else {
            Err(WeibullError::observation(format!(
                "unrecognized status code `{s}` (expected F or S)"
            )))
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single life observation.
///
/// The lifetime is always finite and strictly positive; this is checked on
/// construction and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct Observation {
    lifetime: f64,
    status: Status,
}

#[derive(Deserialize)]
struct RawObservation {
    lifetime: f64,
    status: Status,
}

impl TryFrom<RawObservation> for Observation {
    type Error = WeibullError;

    fn try_from(raw: RawObservation) -> Result<Self> {
        Observation::new(raw.lifetime, raw.status)
    }
}

impl Observation {
    /// Creates an observation.
    ///
    /// # Errors
    /// [`WeibullError::InvalidObservation`] if `lifetime` is not finite or
    /// not strictly positive.
    pub fn new(lifetime: f64, status: Status) -> Result<Self> {
        if !lifetime.is_finite() {
            return Err(WeibullError::observation(format!(
                "lifetime must be finite, got {lifetime}"
            )));
        }
        if lifetime <= 0.0 {
            return Err(WeibullError::observation(format!(
                "lifetime must be positive, got {lifetime}"
            )));
        }
        Ok(Self { lifetime, status })
    }

    /// Shorthand for an exact failure at `lifetime`.
    pub fn failure(lifetime: f64) -> Result<Self> {
        Self::new(lifetime, Status::Failure)
    }

    /// Shorthand for a suspension at `lifetime`.
    pub fn suspension(lifetime: f64) -> Result<Self> {
        Self::new(lifetime, Status::Suspended)
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_censored(&self) -> bool {
        self.status.is_censored()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_censored()
    }

    /// Sample order: ascending lifetime, failures before suspensions.
    fn sample_order(&self, other: &Self) -> Ordering {
        self.lifetime
            .total_cmp(&other.lifetime)
            .then(self.status.cmp(&other.status))
    }
}

/// An ordered working set of observations.
///
/// # Examples
///
/// ```
/// use u_reliability::sample::{Observation, Sample, Status};
///
/// let mut sample = Sample::new();
/// sample.push(Observation::suspension(200.0).unwrap());
/// sample.push(Observation::failure(100.0).unwrap());
/// sample.push(Observation::failure(200.0).unwrap());
///
/// let order: Vec<(f64, Status)> = sample
///     .iter()
///     .map(|o| (o.lifetime(), o.status()))
///     .collect();
/// assert_eq!(
///     order,
///     vec![
///         (100.0, Status::Failure),
///         (200.0, Status::Failure),
///         (200.0, Status::Suspended),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct Sample {
    observations: Vec<Observation>,
}

impl Sample {
    /// Creates an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sample from observations in any order.
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut observations: Vec<Observation> = observations.into_iter().collect();
        observations.sort_by(Observation::sample_order);
        Self { observations }
    }

    /// Inserts an observation at its sorted position.
    ///
    /// Among observations with identical lifetime and status, the new one
    /// goes last.
    pub fn push(&mut self, observation: Observation) {
        let pos = self
            .observations
            .partition_point(|o| o.sample_order(&observation) != Ordering::Greater);
        self.observations.insert(pos, observation);
    }

    /// Removes the observation at sorted position `index`.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<Observation> {
        if index < self.observations.len() {
            Some(self.observations.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.observations.clear();
    }

    /// Parses `text` with [`parse_batch`] and inserts every valid line.
    pub fn import_batch(&mut self, text: &str) -> ImportReport {
        let batch = parse_batch(text);
        let accepted = batch.observations.len();
        self.extend(batch.observations);
        ImportReport {
            accepted,
            rejected: batch.rejected,
        }
    }

    /// Returns a copy with every lifetime multiplied by `factor`.
    ///
    /// # Errors
    /// [`WeibullError::InvalidObservation`] if `factor` is not positive and
    /// finite, or if a scaled lifetime overflows.
    pub fn scaled(&self, factor: f64) -> Result<Sample> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(WeibullError::observation(format!(
                "scale factor must be positive and finite, got {factor}"
            )));
        }
        let scaled = self
            .observations
            .iter()
            .map(|o| Observation::new(o.lifetime * factor, o.status))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_observations(scaled))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Observations in sample order.
    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn failure_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_failure()).count()
    }

    pub fn suspension_count(&self) -> usize {
        self.observations.len() - self.failure_count()
    }

    /// Largest recorded lifetime, failures and suspensions alike.
    pub fn max_lifetime(&self) -> Option<f64> {
        self.observations.last().map(Observation::lifetime)
    }
}

impl Extend<Observation> for Sample {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        self.observations.extend(iter);
        self.observations.sort_by(Observation::sample_order);
    }
}

impl FromIterator<Observation> for Sample {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::from_observations(iter)
    }
}

impl From<Vec<Observation>> for Sample {
    fn from(observations: Vec<Observation>) -> Self {
        Self::from_observations(observations)
    }
}

impl From<Sample> for Vec<Observation> {
    fn from(sample: Sample) -> Self {
        sample.observations
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

// ---------------------------------------------------------------------------
// Batch import
// ---------------------------------------------------------------------------

/// A batch line that could not be turned into an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    /// 1-based line number within the batch text.
    pub line: usize,
    /// The line as written.
    pub content: String,
    /// Why it was rejected.
    pub error: WeibullError,
}

/// Outcome of [`parse_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchImport {
    /// Valid observations, in input order.
    pub observations: Vec<Observation>,
    /// Malformed lines. Blank lines are not reported.
    pub rejected: Vec<RejectedLine>,
}

/// Outcome of [`Sample::import_batch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Number of observations added to the sample.
    pub accepted: usize,
    pub rejected: Vec<RejectedLine>,
}

/// Parses batch text into observations.
///
/// Tokens beyond the second are ignored. Leading separators are tolerated.
pub fn parse_batch(text: &str) -> BatchImport {
    let mut batch = BatchImport::default();

    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            None => {}
            Some(Ok(observation)) => batch.observations.push(observation),
            Some(Err(error)) => batch.rejected.push(RejectedLine {
                line: idx + 1,
                content: line.to_string(),
                error,
            }),
        }
    }

    tracing::debug!(
        accepted = batch.observations.len(),
        rejected = batch.rejected.len(),
        "parsed observation batch"
    );

    batch
}

/// `None` for a blank line.
fn parse_line(line: &str) -> Option<Result<Observation>> {
    let mut tokens = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());

    let lifetime_token = tokens.next()?;
    Some(parse_tokens(lifetime_token, tokens.next()))
}

fn parse_tokens(lifetime_token: &str, status_token: Option<&str>) -> Result<Observation> {
    let lifetime: f64 = lifetime_token.parse().map_err(|_| {
        WeibullError::observation(format!("could not parse lifetime `{lifetime_token}`"))
    })?;
    let status: Status = status_token
        .ok_or_else(|| WeibullError::observation("missing status code"))?
        .parse()?;
    Observation::new(lifetime, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(lifetime: f64, status: Status) -> Observation {
        Observation::new(lifetime, status).expect("valid observation")
    }

    #[test]
    fn test_observation_rejects_invalid_lifetimes() {
        assert!(Observation::failure(0.0).is_err());
        assert!(Observation::failure(-5.0).is_err());
        assert!(Observation::suspension(f64::NAN).is_err());
        assert!(Observation::suspension(f64::INFINITY).is_err());
        assert!(Observation::failure(1e-9).is_ok());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!("F".parse::<Status>(), Ok(Status::Failure));
        assert_eq!("s".parse::<Status>(), Ok(Status::Suspended));
        assert!("X".parse::<Status>().is_err());
        assert!("FF".parse::<Status>().is_err());
        assert_eq!(Status::Suspended.to_string(), "S");
        assert!(Status::Suspended.is_censored());
        assert!(!Status::Failure.is_censored());
    }

    #[test]
    fn test_sorted_with_failures_first_on_ties() {
        let sample = Sample::from_observations([
            obs(300.0, Status::Failure),
            obs(250.0, Status::Suspended),
            obs(250.0, Status::Failure),
            obs(100.0, Status::Suspended),
        ]);
        let got: Vec<(f64, Status)> = sample.iter().map(|o| (o.lifetime(), o.status())).collect();
        assert_eq!(
            got,
            vec![
                (100.0, Status::Suspended),
                (250.0, Status::Failure),
                (250.0, Status::Suspended),
                (300.0, Status::Failure),
            ]
        );
    }

    #[test]
    fn test_push_keeps_order() {
        let mut sample = Sample::new();
        for (t, s) in [
            (300.0, Status::Failure),
            (100.0, Status::Failure),
            (250.0, Status::Suspended),
            (150.0, Status::Failure),
            (250.0, Status::Failure),
        ] {
            sample.push(obs(t, s));
        }
        let lifetimes: Vec<f64> = sample.iter().map(Observation::lifetime).collect();
        assert_eq!(lifetimes, vec![100.0, 150.0, 250.0, 250.0, 300.0]);
        assert_eq!(sample.as_slice()[2].status(), Status::Failure);
        assert_eq!(sample.as_slice()[3].status(), Status::Suspended);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut sample = Sample::from_observations([
            obs(10.0, Status::Failure),
            obs(20.0, Status::Suspended),
            obs(30.0, Status::Failure),
        ]);
        assert_eq!(sample.remove(1), Some(obs(20.0, Status::Suspended)));
        assert_eq!(sample.remove(5), None);
        assert_eq!(sample.len(), 2);
        assert_eq!(sample.suspension_count(), 0);

        sample.clear();
        assert!(sample.is_empty());
        assert_eq!(sample.max_lifetime(), None);
    }

    #[test]
    fn test_counts() {
        let sample = Sample::from_observations([
            obs(10.0, Status::Failure),
            obs(20.0, Status::Suspended),
            obs(30.0, Status::Failure),
            obs(40.0, Status::Suspended),
            obs(50.0, Status::Suspended),
        ]);
        assert_eq!(sample.failure_count(), 2);
        assert_eq!(sample.suspension_count(), 3);
        assert_eq!(sample.max_lifetime(), Some(50.0));
    }

    #[test]
    fn test_scaled() {
        let sample = Sample::from_observations([obs(10.0, Status::Failure), obs(20.0, Status::Suspended)]);
        let scaled = sample.scaled(2.5).expect("valid factor");
        assert_eq!(scaled.as_slice()[0], obs(25.0, Status::Failure));
        assert_eq!(scaled.as_slice()[1], obs(50.0, Status::Suspended));

        assert!(sample.scaled(0.0).is_err());
        assert!(sample.scaled(-1.0).is_err());
        assert!(sample.scaled(f64::NAN).is_err());
        assert!(sample.scaled(f64::MAX).is_err(), "overflowing lifetimes are rejected");
    }

    #[test]
    fn test_parse_batch_separators() {
        let text = "100,F\n200\tS\n300   f\n  400 , s\n500,,F";
        let batch = parse_batch(text);
        assert!(batch.rejected.is_empty(), "rejected: {:?}", batch.rejected);
        let got: Vec<(f64, Status)> = batch
            .observations
            .iter()
            .map(|o| (o.lifetime(), o.status()))
            .collect();
        assert_eq!(
            got,
            vec![
                (100.0, Status::Failure),
                (200.0, Status::Suspended),
                (300.0, Status::Failure),
                (400.0, Status::Suspended),
                (500.0, Status::Failure),
            ]
        );
    }

    #[test]
    fn test_parse_batch_rejects_malformed_lines() {
        let text = "100 F\n\nabc F\n-5 F\n0 S\n200 X\n300\n400 S extra tokens\n";
        let batch = parse_batch(text);

        assert_eq!(batch.observations.len(), 2);
        assert_eq!(batch.observations[1], obs(400.0, Status::Suspended));

        let lines: Vec<usize> = batch.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
        assert_eq!(batch.rejected[0].content, "abc F");
        for rejected in &batch.rejected {
            assert!(matches!(
                rejected.error,
                WeibullError::InvalidObservation { .. }
            ));
        }
    }

    #[test]
    fn test_parse_batch_non_finite_lifetime() {
        let batch = parse_batch("inf F\nNaN S");
        assert!(batch.observations.is_empty());
        assert_eq!(batch.rejected.len(), 2);
    }

    #[test]
    fn test_parse_batch_crlf() {
        let batch = parse_batch("100,F\r\n200,S\r\n");
        assert_eq!(batch.observations.len(), 2);
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn test_import_batch_merges_sorted() {
        let mut sample = Sample::from_observations([obs(150.0, Status::Failure)]);
        let report = sample.import_batch("300 F\n100 S\nnope\n");
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected.len(), 1);
        let lifetimes: Vec<f64> = sample.iter().map(Observation::lifetime).collect();
        assert_eq!(lifetimes, vec![100.0, 150.0, 300.0]);
    }

    #[test]
    fn test_serde_roundtrip_and_validation() {
        let sample = Sample::from_observations([obs(20.0, Status::Suspended), obs(10.0, Status::Failure)]);
        let json = serde_json::to_string(&sample).expect("serialize");
        let back: Sample = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, sample);

        let unsorted = r#"[{"lifetime":30.0,"status":"Failure"},{"lifetime":5.0,"status":"Suspended"}]"#;
        let parsed: Sample = serde_json::from_str(unsorted).expect("deserialize");
        assert_eq!(parsed.as_slice()[0].lifetime(), 5.0);

        let invalid = r#"[{"lifetime":-1.0,"status":"Failure"}]"#;
        assert!(serde_json::from_str::<Sample>(invalid).is_err());
    }
}
