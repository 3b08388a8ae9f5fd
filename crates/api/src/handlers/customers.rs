//! Handlers for the `/customers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opsdeck_core::activity::{ACTION_CREATED, ACTION_DELETED, ACTION_UPDATED, ENTITY_CUSTOMER};
use opsdeck_core::error::CoreError;
use opsdeck_core::ownership::{require_owned, visible_to};
use opsdeck_core::sales::{summarize_customers, validate_customer_status};
use opsdeck_core::types::DbId;
use opsdeck_core::users::validate_email;
use opsdeck_core::validation::{validate_description, validate_name};
use opsdeck_db::models::sales::{CreateCustomer, UpdateCustomer};
use opsdeck_db::repositories::{CustomerRepo, DealRepo};

use crate::activity;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_contact(
    email: Option<&str>,
    company: Option<&str>,
    notes: Option<&str>,
    status: Option<&str>,
) -> AppResult<()> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(company) = company {
        validate_name(company, "Company")?;
    }
    validate_description(notes, "Notes")?;
    if let Some(status) = status {
        validate_customer_status(status)?;
    }
    Ok(())
}

/// GET /customers
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let customers = CustomerRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: customers }))
}

/// POST /customers
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    validate_name(&input.name, "Name")?;
    validate_contact(
        input.email.as_deref(),
        input.company.as_deref(),
        input.notes.as_deref(),
        input.status.as_deref(),
    )?;

    let customer = CustomerRepo::create(&state.pool, caller.user_id, &input).await?;

    activity::record(
        &state.pool,
        &caller,
        ACTION_CREATED,
        ENTITY_CUSTOMER,
        customer.id,
        &customer.name,
    )
    .await;
    tracing::info!(user_id = caller.user_id, customer_id = customer.id, "Customer created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// GET /customers/summary
pub async fn summary(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = CustomerRepo::list_statuses(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: summarize_customers(statuses.iter().map(String::as_str)),
    }))
}

/// GET /customers/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let customer = visible_to(CustomerRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    Ok(Json(DataResponse { data: customer }))
}

/// PUT /customers/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    require_owned(CustomerRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    if let Some(ref name) = input.name {
        validate_name(name, "Name")?;
    }
    validate_contact(
        input.email.as_deref(),
        input.company.as_deref(),
        input.notes.as_deref(),
        input.status.as_deref(),
    )?;

    let customer = CustomerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Customer",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_UPDATED, ENTITY_CUSTOMER, id, &customer.name)
        .await;
    tracing::info!(user_id = caller.user_id, customer_id = id, "Customer updated");

    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /customers/{id}
///
/// The customer's deals are deleted with it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let caller = auth.caller();
    let customer = require_owned(CustomerRepo::find_by_id(&state.pool, id).await?, id, &caller)?;

    let deals_removed = CustomerRepo::delete(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Customer",
            id,
        })?;

    activity::record(&state.pool, &caller, ACTION_DELETED, ENTITY_CUSTOMER, id, &customer.name)
        .await;
    tracing::info!(
        user_id = caller.user_id,
        customer_id = id,
        deals_removed,
        "Customer deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /customers/{id}/deals
pub async fn list_deals(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let customer = visible_to(CustomerRepo::find_by_id(&state.pool, id).await?, &auth.caller());
    let deals = match customer {
        Some(c) => DealRepo::list_for_customer(&state.pool, c.id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data: deals }))
}
