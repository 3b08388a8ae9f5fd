pub mod auth;
pub mod health;
pub mod ideas;
pub mod notification;
pub mod roadmaps;
pub mod sales;
pub mod work;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   create account (public)
/// /auth/login                                      login (public)
/// /users/me                                        get, update
///
/// /ideas                                           list, create
/// /ideas/ranked | /top | /summary                  ranking and status summary
/// /ideas/{id}                                      get, update, delete
/// /ideas/{id}/scores                               list, upsert
/// /ideas/{id}/scores/{criterion_id}                delete
/// /ideas/{id}/recalculate                          recalculate (POST)
/// /idea-criteria                                   list, create
/// /idea-criteria/weights                           bulk weight change (PUT)
/// /idea-criteria/{id}                              update, delete
/// /idea-comparisons                                list, create
/// /idea-comparisons/{id}                           get, update, delete
///
/// /roadmaps                                        list, create
/// /roadmaps/summary                                status summary
/// /roadmaps/{id}                                   get, update, delete
/// /roadmaps/{id}/overview                          summaries and progress
/// /roadmaps/{id}/dependencies                      ready / blocked / dangling
/// /roadmaps/{id}/critical-path                     longest dependency chain
/// /roadmaps/{id}/milestones                        list, create
/// /roadmaps/{id}/features                          list, create
/// /milestones/{id}                                 get, update, delete
/// /features/{id}                                   get, update, delete
///
/// /tasks                                           list, create
/// /tasks/summary                                   metrics
/// /tasks/{id}                                      get, update, delete
/// /campaigns                                       list, create
/// /campaigns/summary                               totals
/// /campaigns/{id}                                  get, update, delete
///
/// /customers                                       list, create
/// /customers/summary                               status summary
/// /customers/{id}                                  get, update, delete
/// /customers/{id}/deals                            deals of customer
/// /deals                                           list, create
/// /deals/pipeline                                  pipeline metrics
/// /deals/{id}                                      get, update, delete
///
/// /notifications                                   list, create
/// /notifications/unread-count                      count
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}/read                         mark read (POST)
/// /notifications/{id}                              delete
/// /activities                                      recent
/// /activities/{entity_type}/{id}                   entity history
/// /dashboard                                       cross-module overview
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and profile.
        .nest("/auth", auth::router())
        .nest("/users", auth::users_router())
        // Idea scoring.
        .nest("/ideas", ideas::router())
        .nest("/idea-criteria", ideas::criteria_router())
        .nest("/idea-comparisons", ideas::comparisons_router())
        // Roadmap planning.
        .nest("/roadmaps", roadmaps::router())
        .nest("/milestones", roadmaps::milestones_router())
        .nest("/features", roadmaps::features_router())
        // Development and marketing.
        .nest("/tasks", work::tasks_router())
        .nest("/campaigns", work::campaigns_router())
        // Sales pipeline.
        .nest("/customers", sales::customers_router())
        .nest("/deals", sales::deals_router())
        // Notifications, activity log and dashboard.
        .nest("/notifications", notification::router())
        .nest("/activities", notification::activities_router())
        .nest("/dashboard", notification::dashboard_router())
}
