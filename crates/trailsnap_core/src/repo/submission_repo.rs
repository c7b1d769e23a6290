//! Submission lifecycle repository: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Drive the pending → completed/failed state machine.
//! - Execute the completion side-effect bundle (points, first-task
//!   achievement, news feed entry) in one transaction.
//!
//! # Invariants
//! - Terminal transitions are guarded with `WHERE status = 'pending'`; of
//!   two racing completions exactly one sees a row change, the other
//!   observes not-found and leaves no side effects.
//! - The first-completion check reads the completed count before the status
//!   update, inside the same transaction.
//! - Any failure between the first read and the final insert rolls the
//!   whole bundle back; the submission stays pending.

use crate::model::achievement::FIRST_STEPS_ACHIEVEMENT;
use crate::model::profile::UserId;
use crate::model::submission::{SubmissionId, SubmissionStatus, TaskSubmission};
use crate::model::task::TaskId;
use crate::repo::achievement_repo::{find_achievement_by_name, grant_if_absent};
use crate::repo::feed_repo::insert_feed_entry;
use crate::repo::profile_repo::{add_points_to_profile, resolve_profile_id};
use crate::repo::{ensure_connection_ready, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use uuid::Uuid;

/// Points credited to the submitting user on every successful completion.
pub const TASK_COMPLETION_POINTS: i64 = 10;

const SUBMISSION_SELECT_SQL: &str = "SELECT
    id,
    status,
    started_at,
    ended_at,
    user_id,
    task_id,
    photo_url
FROM task_submission";

const SUBMISSION_TABLES: &[(&str, &[&str])] = &[
    (
        "task_submission",
        &[
            "id",
            "status",
            "started_at",
            "ended_at",
            "user_id",
            "task_id",
            "photo_url",
        ],
    ),
    ("task", &["id"]),
    ("user_account", &["id", "profile_public_id"]),
    ("user_profile_public", &["id", "points"]),
    ("user_achievement", &["id", "name", "points"]),
    (
        "user_profile_public_has_user_achievement",
        &["profile_id", "achievement_id"],
    ),
    (
        "news_feed",
        &["id", "description", "task_submission_id", "likes"],
    ),
];

/// Repository interface for the submission lifecycle.
pub trait SubmissionRepository {
    /// Creates a pending submission for (user, task).
    fn start_submission(&mut self, user_id: UserId, task_id: TaskId) -> RepoResult<TaskSubmission>;
    /// Completes the pending submission for (user, task) and applies the
    /// side-effect bundle atomically.
    fn complete_submission(
        &mut self,
        user_id: UserId,
        task_id: TaskId,
        photo_url: &str,
        description: &str,
    ) -> RepoResult<TaskSubmission>;
    /// Fails a pending submission. No side effects.
    fn fail_submission(&mut self, id: SubmissionId) -> RepoResult<TaskSubmission>;
    /// Gets one submission by id.
    fn get_submission(&self, id: SubmissionId) -> RepoResult<Option<TaskSubmission>>;
    /// Lists a user's submissions, most recently started first.
    fn list_user_submissions(&self, user_id: UserId) -> RepoResult<Vec<TaskSubmission>>;
}

/// SQLite-backed submission lifecycle repository.
pub struct SqliteSubmissionRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteSubmissionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// The completion bundle touches profiles, achievements, and the news
    /// feed, so readiness covers all of those tables.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, SUBMISSION_TABLES)?;
        Ok(Self { conn })
    }
}

impl SubmissionRepository for SqliteSubmissionRepository<'_> {
    fn start_submission(&mut self, user_id: UserId, task_id: TaskId) -> RepoResult<TaskSubmission> {
        let id = Uuid::new_v4();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let task_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM task WHERE id = ?1);",
            [task_id.to_string()],
            |row| row.get(0),
        )?;
        if task_exists == 0 {
            return Err(RepoError::TaskNotFound(task_id));
        }

        let inserted = tx.execute(
            "INSERT INTO task_submission (id, status, started_at, user_id, task_id)
             VALUES (?1, 'pending', (strftime('%s', 'now') * 1000), ?2, ?3);",
            params![id.to_string(), user_id.to_string(), task_id.to_string()],
        );
        // The partial unique index rejects a second pending attempt for the
        // same (user, task) pair.
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::PendingAlreadyExists { user_id, task_id });
            }
            return Err(err.into());
        }

        let submission = load_submission(&tx, id)?;
        tx.commit()?;
        Ok(submission)
    }

    fn complete_submission(
        &mut self,
        user_id: UserId,
        task_id: TaskId,
        photo_url: &str,
        description: &str,
    ) -> RepoResult<TaskSubmission> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // First-completion check must precede the status update so both
        // reads land in the same transaction.
        let prior_completed: i64 = tx.query_row(
            "SELECT COUNT(*) FROM task_submission
             WHERE user_id = ?1 AND status = 'completed';",
            [user_id.to_string()],
            |row| row.get(0),
        )?;
        let is_first_completion = prior_completed == 0;

        let pending_id: Option<String> = tx
            .query_row(
                "SELECT id FROM task_submission
                 WHERE user_id = ?1 AND task_id = ?2 AND status = 'pending';",
                params![user_id.to_string(), task_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(pending_id) = pending_id else {
            return Err(RepoError::NoPendingSubmission { user_id, task_id });
        };

        // Conditional transition: a racing completion that already turned
        // this row terminal makes `changed` zero here.
        let changed = tx.execute(
            "UPDATE task_submission
             SET
                status = 'completed',
                ended_at = (strftime('%s', 'now') * 1000),
                photo_url = ?1
             WHERE id = ?2 AND status = 'pending';",
            params![photo_url, pending_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NoPendingSubmission { user_id, task_id });
        }

        let profile_id = resolve_profile_id(&tx, user_id)?;
        add_points_to_profile(&tx, profile_id, TASK_COMPLETION_POINTS)?;

        if is_first_completion {
            let achievement = find_achievement_by_name(&tx, FIRST_STEPS_ACHIEVEMENT)?
                .ok_or(RepoError::MissingAchievement(FIRST_STEPS_ACHIEVEMENT))?;
            if grant_if_absent(&tx, profile_id, achievement.id)? {
                add_points_to_profile(&tx, profile_id, achievement.points)?;
            }
        }

        let submission_id = parse_submission_id(&pending_id)?;
        insert_feed_entry(&tx, submission_id, description)?;

        let submission = load_submission(&tx, submission_id)?;
        tx.commit()?;
        Ok(submission)
    }

    fn fail_submission(&mut self, id: SubmissionId) -> RepoResult<TaskSubmission> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE task_submission
             SET status = 'failed', ended_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND status = 'pending';",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::SubmissionNotFound(id));
        }

        let submission = load_submission(&tx, id)?;
        tx.commit()?;
        Ok(submission)
    }

    fn get_submission(&self, id: SubmissionId) -> RepoResult<Option<TaskSubmission>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBMISSION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_submission_row(row)?));
        }
        Ok(None)
    }

    fn list_user_submissions(&self, user_id: UserId) -> RepoResult<Vec<TaskSubmission>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBMISSION_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY started_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut submissions = Vec::new();
        while let Some(row) = rows.next()? {
            submissions.push(parse_submission_row(row)?);
        }
        Ok(submissions)
    }
}

/// Reads one submission on the caller's connection. The row must exist.
fn load_submission(conn: &Connection, id: SubmissionId) -> RepoResult<TaskSubmission> {
    let mut stmt = conn.prepare(&format!("{SUBMISSION_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_submission_row(row);
    }
    Err(RepoError::InvalidData(format!(
        "submission `{id}` missing in read-back"
    )))
}

fn parse_submission_row(row: &Row<'_>) -> RepoResult<TaskSubmission> {
    let id_text: String = row.get("id")?;
    let id = parse_submission_id(&id_text)?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in task_submission.status"
        ))
    })?;

    let user_text: String = row.get("user_id")?;
    let user_id = Uuid::parse_str(&user_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{user_text}` in task_submission.user_id"
        ))
    })?;

    let task_text: String = row.get("task_id")?;
    let task_id = Uuid::parse_str(&task_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{task_text}` in task_submission.task_id"
        ))
    })?;

    Ok(TaskSubmission {
        id,
        status,
        started_at: row.get("started_at")?,
        ended_at: row.get("ended_at")?,
        user_id,
        task_id,
        photo_url: row.get("photo_url")?,
    })
}

fn parse_submission_id(value: &str) -> RepoResult<SubmissionId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{value}` in task_submission.id"
        ))
    })
}

fn parse_status(value: &str) -> Option<SubmissionStatus> {
    match value {
        "pending" => Some(SubmissionStatus::Pending),
        "completed" => Some(SubmissionStatus::Completed),
        "failed" => Some(SubmissionStatus::Failed),
        _ => None,
    }
}
