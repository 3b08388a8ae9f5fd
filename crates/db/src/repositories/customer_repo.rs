//! Repository for the `customers` table.

use opsdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::sales::{CreateCustomer, Customer, UpdateCustomer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, email, company, status, notes, created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a customer. `status` defaults to `lead`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCustomer,
    ) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (user_id, name, email, company, status, notes)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'lead'), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's customers alphabetically.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers WHERE user_id = $1 ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_statuses(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                company = COALESCE($4, company),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.company)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a customer together with its deals.
    ///
    /// Returns the number of deals removed, or `None` if no customer with the
    /// given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deals = sqlx::query("DELETE FROM deals WHERE customer_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(deals))
    }
}
