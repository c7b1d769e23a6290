//! News feed repository: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read feed entries with their comment sub-collections.
//! - Own the like counter and comment append paths.
//!
//! # Invariants
//! - Feed entries are only ever inserted by the completion bundle, on the
//!   caller's transaction.
//! - Likes are unconditional increments; repeat likes by the same user are
//!   not deduplicated.
//! - Comments are returned ascending by `submitted_at`.

use crate::model::feed::{Comment, FeedEntryId, NewsFeedEntry};
use crate::model::profile::UserId;
use crate::model::submission::SubmissionId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use uuid::Uuid;

const FEED_SELECT_SQL: &str = "SELECT
    id,
    description,
    task_submission_id,
    likes,
    created_at
FROM news_feed";

const FEED_TABLES: &[(&str, &[&str])] = &[
    (
        "news_feed",
        &["id", "description", "task_submission_id", "likes", "created_at"],
    ),
    (
        "comment",
        &["id", "text", "author_user_id", "news_feed_id", "submitted_at"],
    ),
    ("user_account", &["id", "profile_public_id"]),
    ("user_profile_public", &["id", "name"]),
];

/// Repository interface for the news feed.
pub trait FeedRepository {
    /// Lists all feed entries, newest first, each with its comments.
    fn list_feed(&self) -> RepoResult<Vec<NewsFeedEntry>>;
    /// Gets one feed entry with its comments.
    fn get_entry(&self, id: FeedEntryId) -> RepoResult<Option<NewsFeedEntry>>;
    /// Increments the like counter by one and returns the updated entry.
    fn like_entry(&self, id: FeedEntryId) -> RepoResult<NewsFeedEntry>;
    /// Appends a comment and returns the refreshed entry.
    fn add_comment(
        &mut self,
        id: FeedEntryId,
        author: UserId,
        text: &str,
    ) -> RepoResult<NewsFeedEntry>;
}

/// SQLite-backed news feed repository.
pub struct SqliteFeedRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFeedRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, FEED_TABLES)?;
        Ok(Self { conn })
    }
}

impl FeedRepository for SqliteFeedRepository<'_> {
    fn list_feed(&self) -> RepoResult<Vec<NewsFeedEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FEED_SELECT_SQL} ORDER BY created_at DESC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let entry = parse_feed_row(row)?;
            entries.push(with_comments(self.conn, entry)?);
        }
        Ok(entries)
    }

    fn get_entry(&self, id: FeedEntryId) -> RepoResult<Option<NewsFeedEntry>> {
        load_entry(self.conn, id)
    }

    fn like_entry(&self, id: FeedEntryId) -> RepoResult<NewsFeedEntry> {
        let changed = self.conn.execute(
            "UPDATE news_feed SET likes = likes + 1 WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::FeedEntryNotFound(id));
        }

        load_entry(self.conn, id)?.ok_or(RepoError::FeedEntryNotFound(id))
    }

    fn add_comment(
        &mut self,
        id: FeedEntryId,
        author: UserId,
        text: &str,
    ) -> RepoResult<NewsFeedEntry> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM news_feed WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::FeedEntryNotFound(id));
        }

        tx.execute(
            "INSERT INTO comment (id, text, author_user_id, news_feed_id, submitted_at)
             VALUES (?1, ?2, ?3, ?4, (strftime('%s', 'now') * 1000));",
            params![
                Uuid::new_v4().to_string(),
                text,
                author.to_string(),
                id.to_string(),
            ],
        )?;

        let entry = load_entry(&tx, id)?.ok_or(RepoError::FeedEntryNotFound(id))?;
        tx.commit()?;
        Ok(entry)
    }
}

/// Inserts one feed entry for a completed submission on the caller's
/// connection, so the insert joins the completion transaction.
pub(crate) fn insert_feed_entry(
    conn: &Connection,
    submission_id: SubmissionId,
    description: &str,
) -> RepoResult<FeedEntryId> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO news_feed (id, description, task_submission_id, likes, created_at)
         VALUES (?1, ?2, ?3, 0, (strftime('%s', 'now') * 1000));",
        params![id.to_string(), description, submission_id.to_string()],
    )?;
    Ok(id)
}

fn load_entry(conn: &Connection, id: FeedEntryId) -> RepoResult<Option<NewsFeedEntry>> {
    let mut stmt = conn.prepare(&format!("{FEED_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        let entry = parse_feed_row(row)?;
        return Ok(Some(with_comments(conn, entry)?));
    }
    Ok(None)
}

fn with_comments(conn: &Connection, mut entry: NewsFeedEntry) -> RepoResult<NewsFeedEntry> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.text, c.author_user_id, p.name AS author_name, c.submitted_at
         FROM comment c
         INNER JOIN user_account acc ON acc.id = c.author_user_id
         INNER JOIN user_profile_public p ON p.id = acc.profile_public_id
         WHERE c.news_feed_id = ?1
         ORDER BY c.submitted_at ASC, c.id ASC;",
    )?;
    let mut rows = stmt.query([entry.id.to_string()])?;
    while let Some(row) = rows.next()? {
        entry.comments.push(parse_comment_row(row)?);
    }
    Ok(entry)
}

fn parse_feed_row(row: &Row<'_>) -> RepoResult<NewsFeedEntry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in news_feed.id"))
    })?;

    let submission_text: String = row.get("task_submission_id")?;
    let task_submission_id = Uuid::parse_str(&submission_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{submission_text}` in news_feed.task_submission_id"
        ))
    })?;

    Ok(NewsFeedEntry {
        id,
        description: row.get("description")?,
        task_submission_id,
        likes: row.get("likes")?,
        created_at: row.get("created_at")?,
        comments: Vec::new(),
    })
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in comment.id"))
    })?;

    let author_text: String = row.get("author_user_id")?;
    let author = Uuid::parse_str(&author_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{author_text}` in comment.author_user_id"
        ))
    })?;

    Ok(Comment {
        id,
        text: row.get("text")?,
        author,
        author_name: row.get("author_name")?,
        submitted_at: row.get("submitted_at")?,
    })
}
