//! Status-bucket aggregation.
//!
//! One reusable count-and-percentage breakdown for every status-bearing
//! collection (ideas, roadmaps, milestones, features, tasks, campaigns,
//! customers, deals). Totals are recomputed from the records on every read.

use serde::Serialize;

use crate::ratio::percent_of;

/// Count and share of one status value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBucket {
    pub status: String,
    pub count: i64,
    /// `count / total * 100`, one decimal place. 0 when `total` is 0.
    pub percentage: f64,
}

/// Per-status breakdown of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total: i64,
    pub buckets: Vec<StatusBucket>,
    /// Records whose status is not in the bucket list.
    pub other: i64,
}

impl StatusSummary {
    /// Count for `status`, or 0 if it is not a bucket.
    pub fn count(&self, status: &str) -> i64 {
        self.buckets
            .iter()
            .find(|b| b.status == status)
            .map_or(0, |b| b.count)
    }

    /// Percentage for `status`, or 0 if it is not a bucket.
    pub fn percentage(&self, status: &str) -> f64 {
        self.buckets
            .iter()
            .find(|b| b.status == status)
            .map_or(0.0, |b| b.percentage)
    }
}

/// Build a [`StatusSummary`] for `statuses` over the fixed `buckets` list.
///
/// Buckets are reported in the order given, including empty ones.
pub fn summarize<'a, I>(statuses: I, buckets: &[&str]) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = vec![0i64; buckets.len()];
    let mut total = 0i64;
    let mut other = 0i64;

    for status in statuses {
        total += 1;
        match buckets.iter().position(|b| *b == status) {
            Some(idx) => counts[idx] += 1,
            None => other += 1,
        }
    }

    let buckets = buckets
        .iter()
        .zip(counts)
        .map(|(status, count)| StatusBucket {
            status: (*status).to_string(),
            count,
            percentage: percent_of(count as f64, total as f64),
        })
        .collect();

    StatusSummary {
        total,
        buckets,
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKETS: &[&str] = &["draft", "active", "done"];

    #[test]
    fn empty_collection_is_all_zero() {
        let summary = summarize(Vec::<&str>::new(), BUCKETS);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.buckets.len(), 3);
        for bucket in &summary.buckets {
            assert_eq!(bucket.count, 0);
            assert_eq!(bucket.percentage, 0.0);
            assert!(!bucket.percentage.is_nan());
        }
    }

    #[test]
    fn counts_and_percentages() {
        let summary = summarize(["draft", "active", "active", "done"], BUCKETS);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count("active"), 2);
        assert_eq!(summary.percentage("active"), 50.0);
        assert_eq!(summary.percentage("draft"), 25.0);
        assert_eq!(summary.other, 0);
    }

    #[test]
    fn percentages_sum_to_hundred_within_rounding() {
        let statuses = ["draft", "active", "done", "done", "active", "draft", "draft"];
        let summary = summarize(statuses, BUCKETS);
        let sum: f64 = summary.buckets.iter().map(|b| b.percentage).sum();
        let tolerance = 0.1 * BUCKETS.len() as f64;
        assert!((sum - 100.0).abs() <= tolerance, "sum was {sum}");
    }

    #[test]
    fn thirds_round_to_one_decimal() {
        let summary = summarize(["draft", "active", "done"], BUCKETS);
        assert_eq!(summary.percentage("draft"), 33.3);
    }

    #[test]
    fn unknown_statuses_land_in_other() {
        let summary = summarize(["draft", "legacy"], BUCKETS);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.other, 1);
        assert_eq!(summary.percentage("draft"), 50.0);
    }
}
