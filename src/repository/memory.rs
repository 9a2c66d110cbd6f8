//! In-memory repositories.
//!
//! Same contracts as the Postgres ones, including email uniqueness and owner
//! scoping, so services behave identically on top of either. Ids start at 1.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountRepository, RepoResult, TaskRepository, ACCOUNT_EXISTS_MESSAGE};
use crate::error::AppError;
use crate::models::{Account, NewAccount, NewTask, Task, TaskChanges};

struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    table: RwLock<Table<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: NewAccount) -> RepoResult<i64> {
        if account.password_hash.is_empty() {
            return Err(AppError::InternalServerError(
                "refusing to store an account without a password hash".into(),
            ));
        }

        // Check and insert under one write lock, like a unique index.
        let mut table = self.table.write().await;
        if table.rows.values().any(|a| a.email == account.email) {
            return Err(AppError::Conflict(ACCOUNT_EXISTS_MESSAGE.into()));
        }

        let id = table.next_id();
        let now = Utc::now();
        table.rows.insert(
            id,
            Account {
                id,
                email: account.email,
                password_hash: account.password_hash,
                description: account.description,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    table: RwLock<Table<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: NewTask) -> RepoResult<Task> {
        let mut table = self.table.write().await;
        let id = table.next_id();
        let now = Utc::now();
        let created = Task {
            id,
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            status: false,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn list(&self, owner_id: i64) -> RepoResult<Vec<Task>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, changes: TaskChanges) -> RepoResult<Option<Task>> {
        let mut table = self.table.write().await;
        let Some(task) = table
            .rows
            .get_mut(&changes.id)
            .filter(|t| t.owner_id == changes.owner_id)
        else {
            return Ok(None);
        };

        task.title = changes.title;
        task.description = changes.description;
        task.status = changes.status;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn complete(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>> {
        let mut table = self.table.write().await;
        let Some(task) = table
            .rows
            .get_mut(&id)
            .filter(|t| t.owner_id == owner_id)
        else {
            return Ok(None);
        };

        task.status = true;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> RepoResult<bool> {
        let mut table = self.table.write().await;
        let owned = table.rows.get(&id).is_some_and(|t| t.owner_id == owner_id);
        if owned {
            table.rows.remove(&id);
        }
        Ok(owned)
    }
}
