//! Task catalog repository: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and read immutable task definitions.
//! - Keep the difficulty enum mapping inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::task::{Task, TaskDifficulty, TaskId};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    difficulty,
    latitude,
    longitude
FROM task";

const TASK_TABLES: &[(&str, &[&str])] = &[(
    "task",
    &[
        "id",
        "title",
        "description",
        "difficulty",
        "latitude",
        "longitude",
    ],
)];

/// Repository interface for the task catalog.
pub trait TaskRepository {
    /// Persists one task definition and returns its stable id.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Gets one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists the whole catalog ordered by title.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task catalog repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, TASK_TABLES)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO task (id, title, description, difficulty, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                difficulty_to_db(task.difficulty),
                task.latitude,
                task.longitude,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY title ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in task.id"))
    })?;

    let difficulty_text: String = row.get("difficulty")?;
    let difficulty = parse_difficulty(&difficulty_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_text}` in task.difficulty"
        ))
    })?;

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        difficulty,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
    })
}

pub(crate) fn difficulty_to_db(difficulty: TaskDifficulty) -> &'static str {
    match difficulty {
        TaskDifficulty::Easy => "easy",
        TaskDifficulty::Medium => "medium",
        TaskDifficulty::Hard => "hard",
    }
}

pub(crate) fn parse_difficulty(value: &str) -> Option<TaskDifficulty> {
    match value {
        "easy" => Some(TaskDifficulty::Easy),
        "medium" => Some(TaskDifficulty::Medium),
        "hard" => Some(TaskDifficulty::Hard),
        _ => None,
    }
}
