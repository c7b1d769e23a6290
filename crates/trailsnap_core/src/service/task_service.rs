//! Task catalog use-case service.
//!
//! # Responsibility
//! - Provide catalog create/get/list entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::task::{Task, TaskDifficulty, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for the task catalog.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one task definition.
    ///
    /// # Contract
    /// - Field-length limits (title, description) are enforced before
    ///   persistence.
    /// - Returns the created task with its stable id.
    pub fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: TaskDifficulty,
        latitude: f64,
        longitude: f64,
    ) -> RepoResult<Task> {
        let task = Task::new(title, description, difficulty, latitude, longitude);
        self.repo.create_task(&task)?;
        Ok(task)
    }

    /// Gets one task by stable id.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Lists the whole catalog.
    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks()
    }
}
