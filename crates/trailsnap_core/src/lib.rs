//! Core domain logic for TrailSnap.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::achievement::{Achievement, AchievementId, FIRST_STEPS_ACHIEVEMENT};
pub use model::feed::{Comment, CommentId, FeedEntryId, NewsFeedEntry};
pub use model::profile::{ProfileId, RegisteredUser, UserId, UserProfilePublic};
pub use model::submission::{SubmissionId, SubmissionStatus, TaskSubmission};
pub use model::task::{Task, TaskDifficulty, TaskId, TaskValidationError};
pub use repo::achievement_repo::{AchievementRepository, SqliteAchievementRepository};
pub use repo::feed_repo::{FeedRepository, SqliteFeedRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::submission_repo::{
    SqliteSubmissionRepository, SubmissionRepository, TASK_COMPLETION_POINTS,
};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::achievement_service::AchievementService;
pub use service::feed_service::{FeedService, FeedServiceError};
pub use service::submission_service::SubmissionService;
pub use service::task_service::TaskService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
