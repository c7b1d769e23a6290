//! News feed use-case service.
//!
//! # Responsibility
//! - Provide feed read/like/comment APIs to boundary callers.
//!
//! # Invariants
//! - Likes are unconditional increments (no per-user dedup in this core).
//! - Comment text is rejected when blank before reaching persistence.

use crate::model::feed::{FeedEntryId, NewsFeedEntry};
use crate::model::profile::UserId;
use crate::repo::feed_repo::FeedRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for feed use-cases.
#[derive(Debug)]
pub enum FeedServiceError {
    /// Comment text is empty or whitespace-only.
    BlankComment,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for FeedServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankComment => write!(f, "comment text cannot be blank"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FeedServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::BlankComment => None,
        }
    }
}

impl From<RepoError> for FeedServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for the news feed.
pub struct FeedService<R: FeedRepository> {
    repo: R,
}

impl<R: FeedRepository> FeedService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all feed entries, newest first, each with its comments.
    pub fn news_feed(&self) -> RepoResult<Vec<NewsFeedEntry>> {
        self.repo.list_feed()
    }

    /// Gets one feed entry with its comments.
    pub fn get_entry(&self, id: FeedEntryId) -> RepoResult<Option<NewsFeedEntry>> {
        self.repo.get_entry(id)
    }

    /// Increments the like counter by one and returns the updated entry.
    pub fn like_entry(&self, id: FeedEntryId) -> RepoResult<NewsFeedEntry> {
        self.repo.like_entry(id)
    }

    /// Appends a comment and returns the refreshed entry, comments ascending
    /// by submission time.
    pub fn add_comment(
        &mut self,
        id: FeedEntryId,
        author: UserId,
        text: &str,
    ) -> Result<NewsFeedEntry, FeedServiceError> {
        if text.trim().is_empty() {
            return Err(FeedServiceError::BlankComment);
        }
        Ok(self.repo.add_comment(id, author, text)?)
    }
}
