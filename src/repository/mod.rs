//! Persistence contracts for accounts and tasks.
//!
//! # Invariants
//! - Every task read, update and delete is filtered by `id AND owner_id` (`list` by
//!   `owner_id`). A task owned by someone else looks exactly like a missing one.
//! - Account email uniqueness is enforced by the store itself; a duplicate insert
//!   fails with `AppError::Conflict` no matter what the caller checked beforehand.
//! - "No matching row" comes back as `None` / `false`; the services turn that into
//!   `AppError::NotFound`.
//!
//! Two implementations ship: Postgres-backed ([`postgres`]) and in-memory ([`memory`]).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Account, NewAccount, NewTask, Task, TaskChanges};

pub use memory::{InMemoryAccountRepository, InMemoryTaskRepository};
pub use postgres::{PgAccountRepository, PgTaskRepository};

pub type RepoResult<T> = Result<T, AppError>;

pub const ACCOUNT_EXISTS_MESSAGE: &str = "account already exists";

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a new account and returns its id.
    /// Fails with `AppError::Conflict` if the email is taken.
    async fn insert(&self, account: NewAccount) -> RepoResult<i64>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts an open task and returns the stored row.
    async fn create(&self, task: NewTask) -> RepoResult<Task>;

    async fn get(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>>;

    /// All tasks of `owner_id`, highest id first.
    async fn list(&self, owner_id: i64) -> RepoResult<Vec<Task>>;

    /// Overwrites title, description and status and refreshes `updated_at`.
    /// `None` when no row matched `id AND owner_id`.
    async fn update(&self, changes: TaskChanges) -> RepoResult<Option<Task>>;

    /// Sets `status` to completed in one statement, leaving title and description
    /// as stored. `None` when no row matched `id AND owner_id`.
    async fn complete(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>>;

    /// `false` when no row matched `id AND owner_id`.
    async fn delete(&self, id: i64, owner_id: i64) -> RepoResult<bool>;
}
