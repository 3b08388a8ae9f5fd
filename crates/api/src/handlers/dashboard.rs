//! Cross-module overview for the dashboard landing page.
//!
//! Every figure is recomputed from the caller's records on each request.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opsdeck_core::campaigns::{campaign_totals, CampaignTotals};
use opsdeck_core::development::{task_metrics, TaskMetrics};
use opsdeck_core::ideas::summarize_ideas;
use opsdeck_core::ranking::{top_rated, DEFAULT_TOP_N};
use opsdeck_core::roadmap::summarize_roadmaps;
use opsdeck_core::sales::{pipeline_metrics, summarize_customers, PipelineMetrics};
use opsdeck_core::status_summary::StatusSummary;
use opsdeck_db::models::activity::Activity;
use opsdeck_db::models::campaign::Campaign;
use opsdeck_db::models::idea::Idea;
use opsdeck_db::models::sales::Deal;
use opsdeck_db::models::task::{Task, TaskFilter};
use opsdeck_db::repositories::{
    ActivityRepo, CampaignRepo, CustomerRepo, DealRepo, IdeaRepo, NotificationRepo, RoadmapRepo,
    TaskRepo,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of activity entries shown on the dashboard.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct IdeasOverview {
    pub summary: StatusSummary,
    pub top: Vec<Idea>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub ideas: IdeasOverview,
    pub roadmaps: StatusSummary,
    pub tasks: TaskMetrics,
    pub campaigns: CampaignTotals,
    pub customers: StatusSummary,
    pub pipeline: PipelineMetrics,
    pub unread_notifications: i64,
    pub recent_activity: Vec<Activity>,
}

/// GET /dashboard
pub async fn overview(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let user_id = auth.user_id;

    let ideas = IdeaRepo::list_for_user(pool, user_id, None).await?;
    let idea_summary = summarize_ideas(ideas.iter().map(|i| i.status.as_str()));

    let roadmap_statuses = RoadmapRepo::list_statuses(pool, user_id).await?;
    let tasks = TaskRepo::list_for_user(pool, user_id, &TaskFilter::default()).await?;
    let campaigns = CampaignRepo::list_for_user(pool, user_id, None).await?;
    let customer_statuses = CustomerRepo::list_statuses(pool, user_id).await?;
    let deals = DealRepo::list_for_user(pool, user_id, None).await?;
    let unread_notifications = NotificationRepo::unread_count(pool, user_id).await?;
    let recent_activity = ActivityRepo::list_recent(pool, user_id, RECENT_ACTIVITY_LIMIT, 0).await?;

    let task_inputs: Vec<_> = tasks.iter().map(Task::progress_input).collect();
    let campaign_figures: Vec<_> = campaigns.iter().map(Campaign::figures).collect();
    let deal_figures: Vec<_> = deals.iter().map(Deal::figures).collect();

    let dashboard = Dashboard {
        ideas: IdeasOverview {
            summary: idea_summary,
            top: top_rated(ideas, DEFAULT_TOP_N),
        },
        roadmaps: summarize_roadmaps(roadmap_statuses.iter().map(String::as_str)),
        tasks: task_metrics(&task_inputs, Utc::now().date_naive()),
        campaigns: campaign_totals(&campaign_figures),
        customers: summarize_customers(customer_statuses.iter().map(String::as_str)),
        pipeline: pipeline_metrics(&deal_figures),
        unread_notifications,
        recent_activity,
    };

    Ok(Json(DataResponse { data: dashboard }))
}
