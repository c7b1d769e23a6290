//! Profile/points repository: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Register user accounts with their public profiles.
//! - Own the point-balance mutation path (additive awards only).
//!
//! # Invariants
//! - Registration creates the profile and the account row in one
//!   transaction; an account without a profile never exists.
//! - Points are only mutated through `points = points + n` updates.

use crate::model::profile::{ProfileId, RegisteredUser, UserId, UserProfilePublic};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use uuid::Uuid;

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    name,
    points,
    created_at,
    avatar_url
FROM user_profile_public";

const PROFILE_TABLES: &[(&str, &[&str])] = &[
    (
        "user_profile_public",
        &["id", "name", "points", "created_at", "avatar_url"],
    ),
    ("user_account", &["id", "profile_public_id"]),
];

/// Repository interface for accounts, profiles, and the points ledger.
pub trait ProfileRepository {
    /// Creates a public profile (points = 0) plus its account row atomically.
    fn register_user(&mut self, name: &str, avatar_url: &str) -> RepoResult<RegisteredUser>;
    /// Gets one public profile by profile id.
    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<UserProfilePublic>>;
    /// Gets the public profile owned by a user account.
    fn profile_for_user(&self, user_id: UserId) -> RepoResult<Option<UserProfilePublic>>;
    /// Adds points to the user's public profile balance.
    fn add_points(&self, user_id: UserId, amount: i64) -> RepoResult<()>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PROFILE_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn register_user(&mut self, name: &str, avatar_url: &str) -> RepoResult<RegisteredUser> {
        let profile_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO user_profile_public (id, name, points, created_at, avatar_url)
             VALUES (?1, ?2, 0, (strftime('%s', 'now') * 1000), ?3);",
            params![profile_id.to_string(), name, avatar_url],
        )?;
        tx.execute(
            "INSERT INTO user_account (id, profile_public_id) VALUES (?1, ?2);",
            params![user_id.to_string(), profile_id.to_string()],
        )?;
        tx.commit()?;

        Ok(RegisteredUser {
            user_id,
            profile_id,
        })
    }

    fn get_profile(&self, id: ProfileId) -> RepoResult<Option<UserProfilePublic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn profile_for_user(&self, user_id: UserId) -> RepoResult<Option<UserProfilePublic>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROFILE_SELECT_SQL}
             WHERE id = (SELECT profile_public_id FROM user_account WHERE id = ?1);"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn add_points(&self, user_id: UserId, amount: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_profile_public
             SET points = points + ?1
             WHERE id = (SELECT profile_public_id FROM user_account WHERE id = ?2);",
            params![amount, user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ProfileNotFound(user_id));
        }

        Ok(())
    }
}

/// Resolves the public-profile id owned by a user account.
///
/// Runs on the caller's connection so it participates in any enclosing
/// transaction.
pub(crate) fn resolve_profile_id(conn: &Connection, user_id: UserId) -> RepoResult<ProfileId> {
    let profile_text: Option<String> = conn
        .query_row(
            "SELECT profile_public_id FROM user_account WHERE id = ?1;",
            [user_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    let profile_text = profile_text.ok_or(RepoError::ProfileNotFound(user_id))?;
    Uuid::parse_str(&profile_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{profile_text}` in user_account.profile_public_id"
        ))
    })
}

/// Adds points directly to a profile row on the caller's connection.
pub(crate) fn add_points_to_profile(
    conn: &Connection,
    profile_id: ProfileId,
    amount: i64,
) -> RepoResult<()> {
    let changed = conn.execute(
        "UPDATE user_profile_public SET points = points + ?1 WHERE id = ?2;",
        params![amount, profile_id.to_string()],
    )?;

    if changed == 0 {
        return Err(RepoError::InvalidData(format!(
            "profile row `{profile_id}` missing during point award"
        )));
    }

    Ok(())
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<UserProfilePublic> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in user_profile_public.id"
        ))
    })?;

    Ok(UserProfilePublic {
        id,
        name: row.get("name")?,
        points: row.get("points")?,
        created_at: row.get("created_at")?,
        avatar_url: row.get("avatar_url")?,
    })
}
