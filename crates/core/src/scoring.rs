//! Weighted idea scoring.
//!
//! An idea's total is the weighted mean of its per-criterion scores:
//! `Σ(score × weight) / Σ(weight)`. The full score set is re-summed on every
//! recalculation; nothing is maintained incrementally.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ratio::round_to;
use crate::validation::validate_int_range;

/// Lowest accepted criterion score.
pub const MIN_SCORE: i32 = 1;
/// Highest accepted criterion score.
pub const MAX_SCORE: i32 = 10;
/// Lowest accepted criterion weight.
pub const MIN_WEIGHT: i32 = 1;
/// Highest accepted criterion weight.
pub const MAX_WEIGHT: i32 = 10;
/// Decimal places kept on a stored total.
pub const SCORE_DECIMALS: u32 = 2;

/// One criterion score paired with the criterion's current weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScore {
    pub weight: f64,
    pub score: f64,
}

impl WeightedScore {
    pub fn new(weight: impl Into<f64>, score: impl Into<f64>) -> Self {
        Self {
            weight: weight.into(),
            score: score.into(),
        }
    }
}

/// Weighted mean of `scores`, unrounded.
///
/// Returns 0 when `scores` is empty or the weights sum to zero.
pub fn aggregate_score(scores: &[WeightedScore]) -> f64 {
    let total_weight: f64 = scores.iter().map(|s| s.weight).sum();
    if total_weight == 0.0 {
        return 0.0;
    }
    let weighted: f64 = scores.iter().map(|s| s.score * s.weight).sum();
    weighted / total_weight
}

/// Round a total to [`SCORE_DECIMALS`] places.
pub fn round_score(value: f64) -> f64 {
    round_to(value, SCORE_DECIMALS)
}

/// Aggregate and round in one step. `None` when there are no scores.
pub fn total_score(scores: &[WeightedScore]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(round_score(aggregate_score(scores)))
    }
}

/// Validate a per-criterion score.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    validate_int_range(score, MIN_SCORE, MAX_SCORE, "Score")
}

/// Validate a criterion weight.
pub fn validate_weight(weight: i32) -> Result<(), CoreError> {
    validate_int_range(weight, MIN_WEIGHT, MAX_WEIGHT, "Weight")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_mean_matches_worked_example() {
        let scores = [WeightedScore::new(8, 9), WeightedScore::new(4, 5)];
        let raw = aggregate_score(&scores);
        assert!((raw - 92.0 / 12.0).abs() < 1e-12);
        assert_eq!(round_score(raw), 7.67);
        assert_eq!(total_score(&scores), Some(7.67));
    }

    #[test]
    fn empty_scores_aggregate_to_zero() {
        assert_eq!(aggregate_score(&[]), 0.0);
        assert_eq!(total_score(&[]), None);
    }

    #[test]
    fn zero_weights_aggregate_to_zero() {
        let scores = [WeightedScore::new(0, 9), WeightedScore::new(0, 3)];
        let raw = aggregate_score(&scores);
        assert_eq!(raw, 0.0);
        assert!(!raw.is_nan());
    }

    #[test]
    fn equal_weights_are_plain_mean() {
        let scores = [
            WeightedScore::new(1, 2),
            WeightedScore::new(1, 4),
            WeightedScore::new(1, 9),
        ];
        assert_eq!(aggregate_score(&scores), 5.0);
    }

    #[test]
    fn aggregate_stays_within_input_range() {
        for weights in [[1, 1, 1], [10, 1, 5], [3, 7, 2], [1, 10, 10]] {
            for scores in [[1, 1, 1], [10, 10, 10], [1, 10, 5], [9, 2, 7]] {
                let pairs: Vec<WeightedScore> = weights
                    .iter()
                    .zip(scores.iter())
                    .map(|(w, s)| WeightedScore::new(*w, *s))
                    .collect();
                let value = aggregate_score(&pairs);
                assert!(
                    (1.0..=10.0).contains(&value),
                    "{value} out of range for {weights:?} / {scores:?}"
                );
            }
        }
    }

    #[test]
    fn score_and_weight_bounds() {
        assert!(validate_score(1).is_ok());
        assert!(validate_score(10).is_ok());
        assert!(validate_score(0).is_err());
        assert!(validate_weight(11).is_err());
        assert!(validate_weight(5).is_ok());
    }
}
