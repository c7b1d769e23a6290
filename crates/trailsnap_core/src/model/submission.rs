//! Task submission model: one user's attempt at a task.
//!
//! # Responsibility
//! - Define the submission record and its closed status enum.
//!
//! # Invariants
//! - A submission is created `Pending` and transitions exactly once to
//!   `Completed` or `Failed`; terminal states are never re-mutated.
//! - `ended_at` and `photo_url` are only populated by terminal transitions
//!   (`photo_url` only on completion).

use crate::model::profile::UserId;
use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a submission.
pub type SubmissionId = Uuid;

/// Lifecycle state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Attempt started, awaiting a photo.
    Pending,
    /// Photo accepted; side-effect bundle applied.
    Completed,
    /// Attempt abandoned; no side effects.
    Failed,
}

impl SubmissionStatus {
    /// Returns whether this status can never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One user's attempt at a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub id: SubmissionId,
    pub status: SubmissionStatus,
    /// Unix epoch milliseconds, set at creation.
    pub started_at: i64,
    /// Unix epoch milliseconds, set on the terminal transition.
    pub ended_at: Option<i64>,
    pub user_id: UserId,
    pub task_id: TaskId,
    /// Opaque URL of the completion photo. Set only on completion.
    pub photo_url: Option<String>,
}
