//! Achievement registry repository: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the administratively created achievement catalog.
//! - Own grant records linking profiles to achievements.
//!
//! # Invariants
//! - Achievement names are unique; grants are unique per
//!   (profile, achievement) pair and never duplicated.

use crate::model::achievement::{Achievement, AchievementId};
use crate::model::profile::{ProfileId, UserId};
use crate::repo::{ensure_connection_ready, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ACHIEVEMENT_SELECT_SQL: &str = "SELECT id, name, points FROM user_achievement";

const ACHIEVEMENT_TABLES: &[(&str, &[&str])] = &[
    ("user_achievement", &["id", "name", "points"]),
    (
        "user_profile_public_has_user_achievement",
        &["profile_id", "achievement_id"],
    ),
];

/// Repository interface for the achievement registry.
pub trait AchievementRepository {
    /// Inserts one catalog entry. Names are unique.
    fn create_achievement(&self, name: &str, points: i64) -> RepoResult<Achievement>;
    /// Looks up a catalog entry by its unique name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Achievement>>;
    /// Lists achievements granted to a user's public profile, by name.
    fn user_achievements(&self, user_id: UserId) -> RepoResult<Vec<Achievement>>;
    /// Returns whether the profile already holds the achievement.
    fn has_grant(&self, profile_id: ProfileId, achievement_id: AchievementId) -> RepoResult<bool>;
    /// Records a grant. Duplicates are rejected.
    fn grant(&self, profile_id: ProfileId, achievement_id: AchievementId) -> RepoResult<()>;
}

/// SQLite-backed achievement registry.
pub struct SqliteAchievementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAchievementRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, ACHIEVEMENT_TABLES)?;
        Ok(Self { conn })
    }
}

impl AchievementRepository for SqliteAchievementRepository<'_> {
    fn create_achievement(&self, name: &str, points: i64) -> RepoResult<Achievement> {
        let id = Uuid::new_v4();
        let inserted = self.conn.execute(
            "INSERT INTO user_achievement (id, name, points) VALUES (?1, ?2, ?3);",
            params![id.to_string(), name, points],
        );

        match inserted {
            Ok(_) => Ok(Achievement {
                id,
                name: name.to_string(),
                points,
            }),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::AchievementNameTaken(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Achievement>> {
        find_achievement_by_name(self.conn, name)
    }

    fn user_achievements(&self, user_id: UserId) -> RepoResult<Vec<Achievement>> {
        let mut stmt = self.conn.prepare(
            "SELECT ua.id, ua.name, ua.points
             FROM user_achievement ua
             INNER JOIN user_profile_public_has_user_achievement link
                ON link.achievement_id = ua.id
             INNER JOIN user_account acc
                ON acc.profile_public_id = link.profile_id
             WHERE acc.id = ?1
             ORDER BY ua.name ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut achievements = Vec::new();
        while let Some(row) = rows.next()? {
            achievements.push(parse_achievement_row(row)?);
        }
        Ok(achievements)
    }

    fn has_grant(&self, profile_id: ProfileId, achievement_id: AchievementId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM user_profile_public_has_user_achievement
                WHERE profile_id = ?1 AND achievement_id = ?2
            );",
            params![profile_id.to_string(), achievement_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn grant(&self, profile_id: ProfileId, achievement_id: AchievementId) -> RepoResult<()> {
        if grant_if_absent(self.conn, profile_id, achievement_id)? {
            Ok(())
        } else {
            Err(RepoError::DuplicateGrant { achievement_id })
        }
    }
}

/// Looks up one catalog entry by name on the caller's connection.
pub(crate) fn find_achievement_by_name(
    conn: &Connection,
    name: &str,
) -> RepoResult<Option<Achievement>> {
    let mut stmt = conn.prepare(&format!("{ACHIEVEMENT_SELECT_SQL} WHERE name = ?1;"))?;
    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_achievement_row(row)?));
    }
    Ok(None)
}

/// Inserts a grant unless one already exists. Returns whether a row was
/// inserted. The UNIQUE constraint on (profile_id, achievement_id) backstops
/// the existence check under concurrency.
pub(crate) fn grant_if_absent(
    conn: &Connection,
    profile_id: ProfileId,
    achievement_id: AchievementId,
) -> RepoResult<bool> {
    let inserted = conn.execute(
        "INSERT INTO user_profile_public_has_user_achievement (profile_id, achievement_id)
         SELECT ?1, ?2
         WHERE NOT EXISTS (
            SELECT 1
            FROM user_profile_public_has_user_achievement
            WHERE profile_id = ?1 AND achievement_id = ?2
         );",
        params![profile_id.to_string(), achievement_id.to_string()],
    )?;
    Ok(inserted == 1)
}

fn parse_achievement_row(row: &Row<'_>) -> RepoResult<Achievement> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{id_text}` in user_achievement.id"
        ))
    })?;

    Ok(Achievement {
        id,
        name: row.get("name")?,
        points: row.get("points")?,
    })
}
