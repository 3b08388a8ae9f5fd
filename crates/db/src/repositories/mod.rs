//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Ownership checks happen in
//! the caller before any mutating method runs; multi-step cascades open
//! their own transaction.

pub mod activity_repo;
pub mod campaign_repo;
pub mod customer_repo;
pub mod deal_repo;
pub mod feature_repo;
pub mod idea_comparison_repo;
pub mod idea_criterion_repo;
pub mod idea_repo;
pub mod idea_score_repo;
pub mod milestone_repo;
pub mod notification_repo;
pub mod roadmap_repo;
pub mod task_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use campaign_repo::CampaignRepo;
pub use customer_repo::CustomerRepo;
pub use deal_repo::DealRepo;
pub use feature_repo::FeatureRepo;
pub use idea_comparison_repo::IdeaComparisonRepo;
pub use idea_criterion_repo::IdeaCriterionRepo;
pub use idea_repo::IdeaRepo;
pub use idea_score_repo::IdeaScoreRepo;
pub use milestone_repo::MilestoneRepo;
pub use notification_repo::{NewNotification, NotificationRepo};
pub use roadmap_repo::RoadmapRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
