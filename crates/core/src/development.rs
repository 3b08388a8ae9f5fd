//! Development task tracking: statuses and progress metrics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::ratio::percent_of;
use crate::status_summary::{summarize, StatusSummary};
use crate::validation::validate_one_of;

pub const TASK_STATUS_TODO: &str = "todo";
pub const TASK_STATUS_IN_PROGRESS: &str = "in_progress";
pub const TASK_STATUS_IN_REVIEW: &str = "in_review";
pub const TASK_STATUS_DONE: &str = "done";

pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_STATUS_TODO,
    TASK_STATUS_IN_PROGRESS,
    TASK_STATUS_IN_REVIEW,
    TASK_STATUS_DONE,
];

pub fn validate_task_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_TASK_STATUSES, "task status")
}

/// The fields of a task that progress metrics read.
#[derive(Debug, Clone, Copy)]
pub struct TaskProgressInput<'a> {
    pub status: &'a str,
    pub due_date: Option<NaiveDate>,
    pub estimate_hours: Option<f64>,
}

/// Derived task metrics for the development board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskMetrics {
    pub summary: StatusSummary,
    /// Share of tasks that are done, one decimal.
    pub completion_percentage: f64,
    /// Tasks past their due date that are not done.
    pub overdue: i64,
    pub estimated_hours_total: f64,
    pub estimated_hours_remaining: f64,
}

/// A task is overdue when its due date is before `today` and it is not done.
pub fn is_overdue(status: &str, due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    status != TASK_STATUS_DONE && due_date.is_some_and(|d| d < today)
}

pub fn task_metrics(tasks: &[TaskProgressInput<'_>], today: NaiveDate) -> TaskMetrics {
    let summary = summarize(tasks.iter().map(|t| t.status), VALID_TASK_STATUSES);
    let done = summary.count(TASK_STATUS_DONE);

    let overdue = tasks
        .iter()
        .filter(|t| is_overdue(t.status, t.due_date, today))
        .count() as i64;

    let estimated_hours_total: f64 = tasks.iter().filter_map(|t| t.estimate_hours).sum();
    let estimated_hours_remaining: f64 = tasks
        .iter()
        .filter(|t| t.status != TASK_STATUS_DONE)
        .filter_map(|t| t.estimate_hours)
        .sum();

    TaskMetrics {
        completion_percentage: percent_of(done as f64, summary.total as f64),
        summary,
        overdue,
        estimated_hours_total,
        estimated_hours_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn overdue_requires_past_due_and_not_done() {
        let today = day(10);
        assert!(is_overdue("todo", Some(day(9)), today));
        assert!(!is_overdue("done", Some(day(9)), today));
        assert!(!is_overdue("todo", Some(day(10)), today));
        assert!(!is_overdue("todo", None, today));
    }

    #[test]
    fn metrics_over_mixed_board() {
        let tasks = [
            TaskProgressInput {
                status: "done",
                due_date: Some(day(1)),
                estimate_hours: Some(4.0),
            },
            TaskProgressInput {
                status: "in_progress",
                due_date: Some(day(2)),
                estimate_hours: Some(6.0),
            },
            TaskProgressInput {
                status: "todo",
                due_date: None,
                estimate_hours: None,
            },
            TaskProgressInput {
                status: "in_review",
                due_date: Some(day(20)),
                estimate_hours: Some(2.0),
            },
        ];
        let metrics = task_metrics(&tasks, day(10));
        assert_eq!(metrics.summary.total, 4);
        assert_eq!(metrics.completion_percentage, 25.0);
        assert_eq!(metrics.overdue, 1);
        assert_eq!(metrics.estimated_hours_total, 12.0);
        assert_eq!(metrics.estimated_hours_remaining, 8.0);
    }

    #[test]
    fn empty_board_is_zeroed() {
        let metrics = task_metrics(&[], day(1));
        assert_eq!(metrics.completion_percentage, 0.0);
        assert_eq!(metrics.overdue, 0);
    }
}
