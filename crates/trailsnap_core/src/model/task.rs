//! Task catalog model.
//!
//! # Responsibility
//! - Define the immutable task definition: what to photograph, where, and
//!   how hard it is.
//! - Enforce field-length limits before persistence.
//!
//! # Invariants
//! - `title` is at most 30 characters, `description` at most 200.
//! - Tasks are never mutated after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task definition.
pub type TaskId = Uuid;

pub const TASK_TITLE_MAX_CHARS: usize = 30;
pub const TASK_DESCRIPTION_MAX_CHARS: usize = 200;

/// Difficulty rating of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskDifficulty {
    Easy,
    Medium,
    Hard,
}

/// An immutable location-based photo task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID.
    pub id: TaskId,
    /// Short display title, at most 30 characters.
    pub title: String,
    /// Instructions for completing the task, at most 200 characters.
    pub description: String,
    pub difficulty: TaskDifficulty,
    pub latitude: f64,
    pub longitude: f64,
}

/// Validation failure for task field limits.
#[derive(Debug)]
pub enum TaskValidationError {
    TitleTooLong { chars: usize, max: usize },
    DescriptionTooLong { chars: usize, max: usize },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooLong { chars, max } => {
                write!(f, "task title is {chars} characters; maximum is {max}")
            }
            Self::DescriptionTooLong { chars, max } => {
                write!(
                    f,
                    "task description is {chars} characters; maximum is {max}"
                )
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates a new task definition with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: TaskDifficulty,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            difficulty,
            latitude,
            longitude,
        }
    }

    /// Checks field-length limits.
    ///
    /// Write paths must call this before SQL mutations.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        let title_chars = self.title.chars().count();
        if title_chars > TASK_TITLE_MAX_CHARS {
            return Err(TaskValidationError::TitleTooLong {
                chars: title_chars,
                max: TASK_TITLE_MAX_CHARS,
            });
        }

        let description_chars = self.description.chars().count();
        if description_chars > TASK_DESCRIPTION_MAX_CHARS {
            return Err(TaskValidationError::DescriptionTooLong {
                chars: description_chars,
                max: TASK_DESCRIPTION_MAX_CHARS,
            });
        }

        Ok(())
    }
}
