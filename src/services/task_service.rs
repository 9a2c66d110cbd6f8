use std::sync::Arc;
use std::time::Duration;

use super::{within, DEFAULT_OPERATION_TIMEOUT};
use crate::error::AppError;
use crate::models::{NewTask, Task, TaskChanges};
use crate::repository::TaskRepository;

/// Message for a task that is missing or owned by someone else.
pub const TASK_NOT_FOUND_MESSAGE: &str = "task not found";

/// Owner-scoped task operations.
///
/// `owner_id` is always the verified caller. Nothing here distinguishes
/// "does not exist" from "belongs to another account".
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    timeout: Duration,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            tasks,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn create(
        &self,
        owner_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Task, AppError> {
        let task = NewTask {
            owner_id,
            title: title.to_string(),
            description: description.to_string(),
        };
        within(self.timeout, self.tasks.create(task)).await
    }

    pub async fn get(&self, task_id: i64, owner_id: i64) -> Result<Task, AppError> {
        within(self.timeout, self.tasks.get(task_id, owner_id))
            .await?
            .ok_or_else(not_found)
    }

    pub async fn list(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        within(self.timeout, self.tasks.list(owner_id)).await
    }

    pub async fn update(&self, changes: TaskChanges) -> Result<Task, AppError> {
        within(self.timeout, self.tasks.update(changes))
            .await?
            .ok_or_else(not_found)
    }

    /// Marks a task completed, keeping its title and description.
    pub async fn complete(&self, task_id: i64, owner_id: i64) -> Result<Task, AppError> {
        within(self.timeout, self.tasks.complete(task_id, owner_id))
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<(), AppError> {
        if within(self.timeout, self.tasks.delete(task_id, owner_id)).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound(TASK_NOT_FOUND_MESSAGE.into())
}
