//! Marketing campaign model and DTOs.

use chrono::NaiveDate;
use opsdeck_core::campaigns::{CampaignFigures, CampaignMetrics};
use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub channel: String,
    pub status: String,
    pub budget: f64,
    pub spent: f64,
    pub leads: i32,
    pub conversions: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Campaign, "Campaign");

impl Campaign {
    pub fn figures(&self) -> CampaignFigures<'_> {
        CampaignFigures {
            status: &self.status,
            budget: self.budget,
            spent: self.spent,
            leads: self.leads,
            conversions: self.conversions,
        }
    }
}

/// A campaign with its derived performance figures.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithMetrics {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub metrics: CampaignMetrics,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `other` if omitted.
    pub channel: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub leads: Option<i32>,
    pub conversions: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub description: Option<String>,
    pub channel: Option<String>,
    pub status: Option<String>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub leads: Option<i32>,
    pub conversions: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
