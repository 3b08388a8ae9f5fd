//! Idea ranking and top-N selection.
//!
//! Ideas are ordered by aggregated score, highest first. Ideas without a
//! computed score always rank after every scored idea and never appear in a
//! top-rated selection. Equal scores fall back to creation time (oldest
//! first), then id, so the order is total and repeatable.

use std::cmp::Ordering;

use crate::types::{DbId, Timestamp};

/// Anything that can be placed in a score ranking.
pub trait Rankable {
    fn rank_id(&self) -> DbId;

    fn rank_score(&self) -> Option<f64>;

    fn rank_created_at(&self) -> Timestamp;
}

/// Default number of entries in a top-rated selection.
pub const DEFAULT_TOP_N: usize = 5;

/// Upper bound on a requested top-rated selection.
pub const MAX_TOP_N: usize = 100;

fn compare<T: Rankable>(a: &T, b: &T) -> Ordering {
    let by_score = match (a.rank_score(), b.rank_score()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score
        .then_with(|| a.rank_created_at().cmp(&b.rank_created_at()))
        .then_with(|| a.rank_id().cmp(&b.rank_id()))
}

/// Order `items` by score descending; unscored items go last.
pub fn rank<T: Rankable>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by(compare::<T>);
    items
}

/// The `n` highest-scored items. Unscored items are excluded.
pub fn top_rated<T: Rankable>(items: Vec<T>, n: usize) -> Vec<T> {
    let scored: Vec<T> = items
        .into_iter()
        .filter(|i| i.rank_score().is_some())
        .collect();
    let mut ranked = rank(scored);
    ranked.truncate(n);
    ranked
}

/// Clamp a requested top-N size to `[1, MAX_TOP_N]`.
pub fn clamp_top_n(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[derive(Debug, Clone)]
    struct Entry {
        id: DbId,
        score: Option<f64>,
        created_minute: u32,
    }

    impl Rankable for Entry {
        fn rank_id(&self) -> DbId {
            self.id
        }

        fn rank_score(&self) -> Option<f64> {
            self.score
        }

        fn rank_created_at(&self) -> Timestamp {
            Utc.with_ymd_and_hms(2026, 1, 1, 12, self.created_minute, 0)
                .unwrap()
        }
    }

    fn entry(id: DbId, score: Option<f64>, created_minute: u32) -> Entry {
        Entry {
            id,
            score,
            created_minute,
        }
    }

    fn ids(entries: &[Entry]) -> Vec<DbId> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn highest_score_first() {
        let ranked = rank(vec![
            entry(1, Some(4.0), 0),
            entry(2, Some(9.5), 1),
            entry(3, Some(7.0), 2),
        ]);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn ties_resolve_oldest_first() {
        let ranked = rank(vec![
            entry(1, Some(5.0), 30),
            entry(2, Some(5.0), 10),
            entry(3, Some(5.0), 20),
        ]);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn unscored_rank_last() {
        let ranked = rank(vec![
            entry(1, None, 0),
            entry(2, Some(1.0), 5),
            entry(3, None, 1),
        ]);
        assert_eq!(ids(&ranked), vec![2, 1, 3]);
    }

    #[test]
    fn top_rated_excludes_unscored_and_truncates() {
        let top = top_rated(
            vec![
                entry(1, None, 0),
                entry(2, Some(3.0), 1),
                entry(3, Some(8.0), 2),
                entry(4, Some(6.0), 3),
            ],
            2,
        );
        assert_eq!(ids(&top), vec![3, 4]);
    }

    #[test]
    fn top_rated_of_only_unscored_is_empty() {
        let top = top_rated(vec![entry(1, None, 0)], 5);
        assert!(top.is_empty());
    }

    #[test]
    fn top_n_is_clamped() {
        assert_eq!(clamp_top_n(None), DEFAULT_TOP_N);
        assert_eq!(clamp_top_n(Some(0)), 1);
        assert_eq!(clamp_top_n(Some(1_000)), MAX_TOP_N);
    }
}
