use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Input structure for creating a task.
/// Contains validation rules for its fields.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Free-form description. Maximum length of 1000 characters.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Input structure for a full update of a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdateInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    /// `false` = open, `true` = completed.
    #[serde(default)]
    pub status: bool,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Task {
    /// Storage-assigned identifier; larger ids were created later.
    pub id: i64,
    /// The account that owns the task. Set once at creation.
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    /// `false` = open, `true` = completed.
    pub status: bool,
    pub created_at: DateTime<Utc>,
    /// Refreshed by every successful update.
    pub updated_at: DateTime<Utc>,
}

/// A task about to be inserted. New tasks are always open.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
}

/// A full-field update, applied only where both `id` and `owner_id` match.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub status: bool,
}

impl TaskChanges {
    pub fn from_input(id: i64, owner_id: i64, input: TaskUpdateInput) -> Self {
        Self {
            id,
            owner_id,
            title: input.title,
            description: input.description,
            status: input.status,
        }
    }
}

/// Body of `GET /api/tasks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}
