//! Sales pipeline: customer and deal vocabularies and pipeline metrics.

use serde::Serialize;

use crate::error::CoreError;
use crate::ratio::{percent_of, round_to};
use crate::status_summary::{summarize, StatusSummary};
use crate::validation::{validate_int_range, validate_non_negative, validate_one_of};

/* --------------------------------------------------------------------------
Customers
-------------------------------------------------------------------------- */

pub const CUSTOMER_STATUS_LEAD: &str = "lead";
pub const CUSTOMER_STATUS_PROSPECT: &str = "prospect";
pub const CUSTOMER_STATUS_ACTIVE: &str = "active";
pub const CUSTOMER_STATUS_CHURNED: &str = "churned";

pub const VALID_CUSTOMER_STATUSES: &[&str] = &[
    CUSTOMER_STATUS_LEAD,
    CUSTOMER_STATUS_PROSPECT,
    CUSTOMER_STATUS_ACTIVE,
    CUSTOMER_STATUS_CHURNED,
];

pub fn validate_customer_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_CUSTOMER_STATUSES, "customer status")
}

pub fn summarize_customers<'a, I>(statuses: I) -> StatusSummary
where
    I: IntoIterator<Item = &'a str>,
{
    summarize(statuses, VALID_CUSTOMER_STATUSES)
}

/* --------------------------------------------------------------------------
Deals
-------------------------------------------------------------------------- */

pub const DEAL_STAGE_LEAD: &str = "lead";
pub const DEAL_STAGE_QUALIFIED: &str = "qualified";
pub const DEAL_STAGE_PROPOSAL: &str = "proposal";
pub const DEAL_STAGE_NEGOTIATION: &str = "negotiation";
pub const DEAL_STAGE_WON: &str = "won";
pub const DEAL_STAGE_LOST: &str = "lost";

pub const VALID_DEAL_STAGES: &[&str] = &[
    DEAL_STAGE_LEAD,
    DEAL_STAGE_QUALIFIED,
    DEAL_STAGE_PROPOSAL,
    DEAL_STAGE_NEGOTIATION,
    DEAL_STAGE_WON,
    DEAL_STAGE_LOST,
];

pub fn validate_deal_stage(stage: &str) -> Result<(), CoreError> {
    validate_one_of(stage, VALID_DEAL_STAGES, "deal stage")
}

/// A closed deal no longer counts toward the open pipeline.
pub fn is_closed_stage(stage: &str) -> bool {
    stage == DEAL_STAGE_WON || stage == DEAL_STAGE_LOST
}

pub fn validate_deal_numbers(value: Option<f64>, probability: Option<i32>) -> Result<(), CoreError> {
    if let Some(v) = value {
        validate_non_negative(v, "Deal value")?;
    }
    if let Some(p) = probability {
        validate_int_range(p, 0, 100, "Probability")?;
    }
    Ok(())
}

/// The fields of a deal that pipeline metrics read.
#[derive(Debug, Clone, Copy)]
pub struct DealFigures<'a> {
    pub stage: &'a str,
    pub value: f64,
    pub probability: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineMetrics {
    pub summary: StatusSummary,
    /// Sum of values of deals not yet won or lost.
    pub open_value: f64,
    /// Open value weighted by each deal's probability.
    pub weighted_value: f64,
    pub won_value: f64,
    pub lost_value: f64,
    /// `won / (won + lost) * 100` by deal count, one decimal.
    pub win_rate: f64,
}

pub fn pipeline_metrics(deals: &[DealFigures<'_>]) -> PipelineMetrics {
    let summary = summarize(deals.iter().map(|d| d.stage), VALID_DEAL_STAGES);

    let open = deals.iter().filter(|d| !is_closed_stage(d.stage));
    let open_value: f64 = open.clone().map(|d| d.value).sum();
    let weighted_value: f64 = open
        .map(|d| d.value * f64::from(d.probability) / 100.0)
        .sum();

    let value_in = |stage: &str| -> f64 {
        deals
            .iter()
            .filter(|d| d.stage == stage)
            .map(|d| d.value)
            .sum()
    };

    let won = summary.count(DEAL_STAGE_WON);
    let lost = summary.count(DEAL_STAGE_LOST);

    PipelineMetrics {
        open_value,
        weighted_value: round_to(weighted_value, 2),
        won_value: value_in(DEAL_STAGE_WON),
        lost_value: value_in(DEAL_STAGE_LOST),
        win_rate: percent_of(won as f64, (won + lost) as f64),
        summary,
    }
}
