//! Submission lifecycle use-case service.
//!
//! # Responsibility
//! - Expose the start/complete/fail state machine to boundary callers.
//! - Emit structured log events for every lifecycle transition.
//!
//! # Invariants
//! - The completion side-effect bundle is atomic; this layer never splits
//!   it into separate repository calls.
//! - Errors pass through unchanged; logging never swallows them.

use crate::model::profile::UserId;
use crate::model::submission::{SubmissionId, TaskSubmission};
use crate::model::task::TaskId;
use crate::repo::submission_repo::SubmissionRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Use-case service wrapper for the submission lifecycle.
pub struct SubmissionService<R: SubmissionRepository> {
    repo: R,
}

impl<R: SubmissionRepository> SubmissionService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Starts a pending submission for (user, task).
    pub fn start_submission(
        &mut self,
        user_id: UserId,
        task_id: TaskId,
    ) -> RepoResult<TaskSubmission> {
        match self.repo.start_submission(user_id, task_id) {
            Ok(submission) => {
                info!(
                    "event=submission_start module=service status=ok submission_id={} user_id={user_id} task_id={task_id}",
                    submission.id
                );
                Ok(submission)
            }
            Err(err) => {
                warn!(
                    "event=submission_start module=service status=error user_id={user_id} task_id={task_id} error={err}"
                );
                Err(err)
            }
        }
    }

    /// Completes the pending submission for (user, task), applying the
    /// atomic side-effect bundle (points, first-task achievement, feed
    /// entry).
    pub fn complete_submission(
        &mut self,
        user_id: UserId,
        task_id: TaskId,
        photo_url: &str,
        description: &str,
    ) -> RepoResult<TaskSubmission> {
        match self
            .repo
            .complete_submission(user_id, task_id, photo_url, description)
        {
            Ok(submission) => {
                info!(
                    "event=submission_complete module=service status=ok submission_id={} user_id={user_id} task_id={task_id}",
                    submission.id
                );
                Ok(submission)
            }
            Err(err) => {
                warn!(
                    "event=submission_complete module=service status=error user_id={user_id} task_id={task_id} error={err}"
                );
                Err(err)
            }
        }
    }

    /// Fails a pending submission. No side effects.
    pub fn fail_submission(&mut self, id: SubmissionId) -> RepoResult<TaskSubmission> {
        match self.repo.fail_submission(id) {
            Ok(submission) => {
                info!(
                    "event=submission_fail module=service status=ok submission_id={}",
                    submission.id
                );
                Ok(submission)
            }
            Err(err) => {
                warn!(
                    "event=submission_fail module=service status=error submission_id={id} error={err}"
                );
                Err(err)
            }
        }
    }

    /// Gets one submission by id.
    pub fn get_submission(&self, id: SubmissionId) -> RepoResult<Option<TaskSubmission>> {
        self.repo.get_submission(id)
    }

    /// Lists a user's submissions, most recently started first.
    pub fn list_user_submissions(&self, user_id: UserId) -> RepoResult<Vec<TaskSubmission>> {
        self.repo.list_user_submissions(user_id)
    }
}
