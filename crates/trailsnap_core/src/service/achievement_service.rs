//! Achievement registry use-case service.
//!
//! # Responsibility
//! - Provide administrative catalog creation and per-user grant listing.
//!
//! # Invariants
//! - Catalog entries are created administratively; grants themselves are
//!   only written by the completion bundle or explicit `grant` calls.

use crate::model::achievement::Achievement;
use crate::model::profile::UserId;
use crate::repo::achievement_repo::AchievementRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for the achievement registry.
pub struct AchievementService<R: AchievementRepository> {
    repo: R,
}

impl<R: AchievementRepository> AchievementService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts one catalog entry. Names are unique.
    pub fn create_achievement(&self, name: &str, points: i64) -> RepoResult<Achievement> {
        self.repo.create_achievement(name, points)
    }

    /// Looks up a catalog entry by its unique name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Achievement>> {
        self.repo.find_by_name(name)
    }

    /// Lists achievements granted to a user's public profile.
    pub fn user_achievements(&self, user_id: UserId) -> RepoResult<Vec<Achievement>> {
        self.repo.user_achievements(user_id)
    }
}
