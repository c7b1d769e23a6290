//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before SQL mutations.
//! - Repository APIs return semantic errors (not-found, missing catalog
//!   entries) in addition to DB transport errors.
//! - Multi-table mutations run inside one transaction on one connection;
//!   helpers never open a second connection mid-unit-of-work.

use crate::db::{migrations::latest_version, DbError};
use crate::model::achievement::AchievementId;
use crate::model::feed::FeedEntryId;
use crate::model::profile::UserId;
use crate::model::submission::SubmissionId;
use crate::model::task::{TaskId, TaskValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod achievement_repo;
pub mod feed_repo;
pub mod profile_repo;
pub mod submission_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    SubmissionNotFound(SubmissionId),
    /// No pending submission exists for the (user, task) pair; the
    /// completion or read targeted an absent or already-terminal attempt.
    NoPendingSubmission {
        user_id: UserId,
        task_id: TaskId,
    },
    /// A pending submission already exists for the (user, task) pair.
    PendingAlreadyExists {
        user_id: UserId,
        task_id: TaskId,
    },
    FeedEntryNotFound(FeedEntryId),
    /// The user has no public profile to attach points or grants to.
    ProfileNotFound(UserId),
    AchievementNameTaken(String),
    /// Required catalog entry is absent. A deployment bug, not a user error.
    MissingAchievement(&'static str),
    DuplicateGrant {
        achievement_id: AchievementId,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::SubmissionNotFound(id) => write!(f, "submission not found: {id}"),
            Self::NoPendingSubmission { user_id, task_id } => write!(
                f,
                "no pending submission for user {user_id} on task {task_id}"
            ),
            Self::PendingAlreadyExists { user_id, task_id } => write!(
                f,
                "pending submission already exists for user {user_id} on task {task_id}"
            ),
            Self::FeedEntryNotFound(id) => write!(f, "news feed entry not found: {id}"),
            Self::ProfileNotFound(user_id) => {
                write!(f, "no public profile for user: {user_id}")
            }
            Self::AchievementNameTaken(name) => {
                write!(f, "achievement name already taken: `{name}`")
            }
            Self::MissingAchievement(name) => write!(
                f,
                "required achievement `{name}` is missing from the catalog"
            ),
            Self::DuplicateGrant { achievement_id } => {
                write!(f, "achievement already granted: {achievement_id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies the connection has all migrations applied and carries the
/// required tables/columns.
///
/// Every `Sqlite*Repository::try_new` runs this against its own table set,
/// so a repository never operates on an unmigrated or foreign database.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    requirements: &[(&'static str, &'static [&'static str])],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in requirements {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for column in *columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

/// Returns whether a rusqlite error is a UNIQUE (or primary key) constraint
/// violation, so callers can map uniqueness failures to semantic errors.
/// Foreign-key violations stay generic DB errors.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
