//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod badge_repo;
pub mod recommendation_repo;
pub mod user_badge_repo;
pub mod user_progress_repo;
pub mod user_stats_repo;

pub use badge_repo::BadgeRepo;
pub use recommendation_repo::RecommendationRepo;
pub use user_badge_repo::UserBadgeRepo;
pub use user_progress_repo::UserProgressRepo;
pub use user_stats_repo::UserStatsRepo;
