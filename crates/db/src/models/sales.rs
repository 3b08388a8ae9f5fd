//! Customer and deal models.

use chrono::NaiveDate;
use opsdeck_core::sales::DealFigures;
use opsdeck_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::impl_owned;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Customer, "Customer");

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    /// Defaults to `lead` if omitted.
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// A row from the `deals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deal {
    pub id: DbId,
    pub user_id: DbId,
    pub customer_id: DbId,
    pub title: String,
    pub value: f64,
    pub stage: String,
    pub probability: i32,
    pub expected_close_date: Option<NaiveDate>,
    /// Set when the deal enters `won` or `lost`, cleared when reopened.
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_owned!(Deal, "Deal");

impl Deal {
    pub fn figures(&self) -> DealFigures<'_> {
        DealFigures {
            stage: &self.stage,
            value: self.value,
            probability: self.probability,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeal {
    pub customer_id: DbId,
    pub title: String,
    pub value: Option<f64>,
    /// Defaults to `lead` if omitted.
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDeal {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close_date: Option<NaiveDate>,
}
