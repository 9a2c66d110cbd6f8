use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountRepository, RepoResult, TaskRepository, ACCOUNT_EXISTS_MESSAGE};
use crate::error::AppError;
use crate::models::{Account, NewAccount, NewTask, Task, TaskChanges};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, description, created_at, updated_at";
const TASK_COLUMNS: &str = "id, owner_id, title, description, status, created_at, updated_at";

/// `accounts` table access over a shared connection pool.
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: NewAccount) -> RepoResult<i64> {
        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO accounts (email, password_hash, description, created_at, updated_at)
             VALUES ($1, $2, $3, now(), now())
             RETURNING id",
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.description)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(ACCOUNT_EXISTS_MESSAGE.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE email = $1 LIMIT 1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>> {
        let sql = format!("SELECT {} FROM accounts WHERE id = $1 LIMIT 1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}

/// `tasks` table access. Every statement carries the owner in its WHERE clause.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, task: NewTask) -> RepoResult<Task> {
        let sql = format!(
            "INSERT INTO tasks (owner_id, title, description, status, created_at, updated_at)
             VALUES ($1, $2, $3, FALSE, now(), now())
             RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.owner_id)
            .bind(&task.title)
            .bind(&task.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn get(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list(&self, owner_id: i64) -> RepoResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY id DESC",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn update(&self, changes: TaskChanges) -> RepoResult<Option<Task>> {
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, updated_at = now()
             WHERE id = $4 AND owner_id = $5
             RETURNING {}",
            TASK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.status)
            .bind(changes.id)
            .bind(changes.owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn complete(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>> {
        let sql = format!(
            "UPDATE tasks
             SET status = TRUE, updated_at = now()
             WHERE id = $1 AND owner_id = $2
             RETURNING {}",
            TASK_COLUMNS
        );
        let completed = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(completed)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
