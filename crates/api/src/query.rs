//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?status=` filter for list endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

/// `?limit=` for top-N endpoints.
#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub limit: Option<usize>,
}

/// `?stage=` filter for deal listing.
#[derive(Debug, Deserialize)]
pub struct StageFilter {
    pub stage: Option<String>,
}

/// Filters for notification listing.
#[derive(Debug, Deserialize)]
pub struct NotificationParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
