//! News feed model: public posts generated from completed submissions.
//!
//! # Responsibility
//! - Define the feed entry and its comment sub-collection read model.
//!
//! # Invariants
//! - Exactly one feed entry exists per completed submission, never for
//!   pending or failed ones.
//! - `likes` starts at 0 and only increments.
//! - Comments are append-only, returned ascending by `submitted_at`.

use crate::model::profile::UserId;
use crate::model::submission::SubmissionId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a news feed entry.
pub type FeedEntryId = Uuid;

/// Stable identifier for a comment.
pub type CommentId = Uuid;

/// A public post generated from a completed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeedEntry {
    pub id: FeedEntryId,
    /// Free-text description supplied at completion time.
    pub description: String,
    pub task_submission_id: SubmissionId,
    pub likes: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Comments ascending by submission time.
    pub comments: Vec<Comment>,
}

/// A comment on a news feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: UserId,
    /// Display name of the author's public profile.
    pub author_name: String,
    /// Unix epoch milliseconds.
    pub submitted_at: i64,
}
