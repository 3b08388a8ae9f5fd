//! Marketing campaign vocabulary and performance metrics.

use serde::Serialize;

use crate::error::CoreError;
use crate::ratio::{percent_of, safe_ratio};
use crate::status_summary::{summarize, StatusSummary};
use crate::validation::{validate_non_negative, validate_one_of};

pub const CAMPAIGN_STATUS_DRAFT: &str = "draft";
pub const CAMPAIGN_STATUS_SCHEDULED: &str = "scheduled";
pub const CAMPAIGN_STATUS_ACTIVE: &str = "active";
pub const CAMPAIGN_STATUS_PAUSED: &str = "paused";
pub const CAMPAIGN_STATUS_COMPLETED: &str = "completed";

pub const VALID_CAMPAIGN_STATUSES: &[&str] = &[
    CAMPAIGN_STATUS_DRAFT,
    CAMPAIGN_STATUS_SCHEDULED,
    CAMPAIGN_STATUS_ACTIVE,
    CAMPAIGN_STATUS_PAUSED,
    CAMPAIGN_STATUS_COMPLETED,
];

pub const VALID_CHANNELS: &[&str] = &[
    "email",
    "social",
    "search",
    "display",
    "content",
    "events",
    "other",
];

pub fn validate_campaign_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_CAMPAIGN_STATUSES, "campaign status")
}

pub fn validate_channel(channel: &str) -> Result<(), CoreError> {
    validate_one_of(channel, VALID_CHANNELS, "channel")
}

/// Validate the numeric columns of a campaign.
pub fn validate_campaign_numbers(
    budget: Option<f64>,
    spent: Option<f64>,
    leads: Option<i32>,
    conversions: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(b) = budget {
        validate_non_negative(b, "Budget")?;
    }
    if let Some(s) = spent {
        validate_non_negative(s, "Spent")?;
    }
    if leads.is_some_and(|l| l < 0) {
        return Err(CoreError::Validation("Leads must not be negative".into()));
    }
    if conversions.is_some_and(|c| c < 0) {
        return Err(CoreError::Validation(
            "Conversions must not be negative".into(),
        ));
    }
    Ok(())
}

/// Derived performance figures for a single campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetrics {
    /// `spent / budget * 100`, one decimal.
    pub budget_utilization: f64,
    /// `conversions / leads * 100`, one decimal.
    pub conversion_rate: f64,
    pub cost_per_lead: f64,
    pub cost_per_conversion: f64,
    pub remaining_budget: f64,
}

pub fn campaign_metrics(budget: f64, spent: f64, leads: i32, conversions: i32) -> CampaignMetrics {
    CampaignMetrics {
        budget_utilization: percent_of(spent, budget),
        conversion_rate: percent_of(f64::from(conversions), f64::from(leads)),
        cost_per_lead: safe_ratio(spent, f64::from(leads)),
        cost_per_conversion: safe_ratio(spent, f64::from(conversions)),
        remaining_budget: budget - spent,
    }
}

/// Portfolio-level totals across campaigns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignTotals {
    pub summary: StatusSummary,
    pub total_budget: f64,
    pub total_spent: f64,
    pub total_leads: i64,
    pub total_conversions: i64,
    pub metrics: CampaignMetrics,
}

/// The fields of a campaign that totals read.
#[derive(Debug, Clone, Copy)]
pub struct CampaignFigures<'a> {
    pub status: &'a str,
    pub budget: f64,
    pub spent: f64,
    pub leads: i32,
    pub conversions: i32,
}

pub fn campaign_totals(campaigns: &[CampaignFigures<'_>]) -> CampaignTotals {
    let summary = summarize(campaigns.iter().map(|c| c.status), VALID_CAMPAIGN_STATUSES);
    let total_budget: f64 = campaigns.iter().map(|c| c.budget).sum();
    let total_spent: f64 = campaigns.iter().map(|c| c.spent).sum();
    let total_leads: i64 = campaigns.iter().map(|c| i64::from(c.leads)).sum();
    let total_conversions: i64 = campaigns.iter().map(|c| i64::from(c.conversions)).sum();

    let metrics = CampaignMetrics {
        budget_utilization: percent_of(total_spent, total_budget),
        conversion_rate: percent_of(total_conversions as f64, total_leads as f64),
        cost_per_lead: safe_ratio(total_spent, total_leads as f64),
        cost_per_conversion: safe_ratio(total_spent, total_conversions as f64),
        remaining_budget: total_budget - total_spent,
    };

    CampaignTotals {
        summary,
        total_budget,
        total_spent,
        total_leads,
        total_conversions,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_campaign_metrics() {
        let m = campaign_metrics(1000.0, 250.0, 50, 5);
        assert_eq!(m.budget_utilization, 25.0);
        assert_eq!(m.conversion_rate, 10.0);
        assert_eq!(m.cost_per_lead, 5.0);
        assert_eq!(m.cost_per_conversion, 50.0);
        assert_eq!(m.remaining_budget, 750.0);
    }

    #[test]
    fn zero_denominators_are_zero() {
        let m = campaign_metrics(0.0, 0.0, 0, 0);
        assert_eq!(m.budget_utilization, 0.0);
        assert_eq!(m.conversion_rate, 0.0);
        assert_eq!(m.cost_per_lead, 0.0);
        assert_eq!(m.cost_per_conversion, 0.0);
    }

    #[test]
    fn totals_sum_columns() {
        let totals = campaign_totals(&[
            CampaignFigures {
                status: "active",
                budget: 500.0,
                spent: 100.0,
                leads: 10,
                conversions: 2,
            },
            CampaignFigures {
                status: "completed",
                budget: 500.0,
                spent: 400.0,
                leads: 30,
                conversions: 2,
            },
        ]);
        assert_eq!(totals.total_budget, 1000.0);
        assert_eq!(totals.total_spent, 500.0);
        assert_eq!(totals.total_leads, 40);
        assert_eq!(totals.metrics.conversion_rate, 10.0);
        assert_eq!(totals.summary.count("active"), 1);
    }

    #[test]
    fn negative_numbers_rejected() {
        assert!(validate_campaign_numbers(Some(-1.0), None, None, None).is_err());
        assert!(validate_campaign_numbers(None, None, Some(-3), None).is_err());
        assert!(validate_campaign_numbers(Some(10.0), Some(5.0), Some(1), Some(0)).is_ok());
    }
}
