use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use taskvault::auth::{PasswordHasher, TokenIssuer};
use taskvault::error::AppError;
use taskvault::models::{Account, NewAccount, NewTask, Task, TaskChanges};
use taskvault::repository::{
    AccountRepository, InMemoryAccountRepository, InMemoryTaskRepository, RepoResult,
    TaskRepository,
};
use taskvault::services::account_service::INVALID_CREDENTIALS_MESSAGE;
use taskvault::services::{AccountService, TaskService};

fn issuer() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(b"service-test-secret", chrono::Duration::hours(24)))
}

fn account_service(repo: Arc<dyn AccountRepository>) -> AccountService {
    AccountService::new(repo, PasswordHasher::new(4), issuer())
}

fn task_service() -> TaskService {
    TaskService::new(Arc::new(InMemoryTaskRepository::new()))
}

/// Hides existing accounts from lookups, so registration always reaches the
/// insert. Mimics two registrations racing past the duplicate check.
struct BlindLookup(InMemoryAccountRepository);

#[async_trait]
impl AccountRepository for BlindLookup {
    async fn insert(&self, account: NewAccount) -> RepoResult<i64> {
        self.0.insert(account).await
    }

    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<Account>> {
        Ok(None)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Account>> {
        self.0.find_by_id(id).await
    }
}

/// A task store that never answers.
struct StalledTasks;

#[async_trait]
impl TaskRepository for StalledTasks {
    async fn create(&self, _task: NewTask) -> RepoResult<Task> {
        stall().await
    }

    async fn get(&self, _id: i64, _owner_id: i64) -> RepoResult<Option<Task>> {
        stall().await
    }

    async fn list(&self, _owner_id: i64) -> RepoResult<Vec<Task>> {
        stall().await
    }

    async fn update(&self, _changes: TaskChanges) -> RepoResult<Option<Task>> {
        stall().await
    }

    async fn complete(&self, _id: i64, _owner_id: i64) -> RepoResult<Option<Task>> {
        stall().await
    }

    async fn delete(&self, _id: i64, _owner_id: i64) -> RepoResult<bool> {
        stall().await
    }
}

/// Serves `complete` from a real store and fails every read-then-write path.
struct CompleteOnly(InMemoryTaskRepository);

#[async_trait]
impl TaskRepository for CompleteOnly {
    async fn create(&self, task: NewTask) -> RepoResult<Task> {
        self.0.create(task).await
    }

    async fn get(&self, _id: i64, _owner_id: i64) -> RepoResult<Option<Task>> {
        Err(AppError::InternalServerError("get not expected".into()))
    }

    async fn list(&self, owner_id: i64) -> RepoResult<Vec<Task>> {
        self.0.list(owner_id).await
    }

    async fn update(&self, _changes: TaskChanges) -> RepoResult<Option<Task>> {
        Err(AppError::InternalServerError("update not expected".into()))
    }

    async fn complete(&self, id: i64, owner_id: i64) -> RepoResult<Option<Task>> {
        self.0.complete(id, owner_id).await
    }

    async fn delete(&self, id: i64, owner_id: i64) -> RepoResult<bool> {
        self.0.delete(id, owner_id).await
    }
}

async fn stall<T>() -> RepoResult<T> {
    tokio::time::sleep(Duration::from_secs(60)).await;
    Err(AppError::InternalServerError("store woke up".into()))
}

#[test_log::test(tokio::test)]
async fn test_register_normalizes_email_and_rejects_duplicates() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let service = account_service(repo.clone());

    let id = service
        .register("  Alice@Example.COM ", "pw1-secret", "")
        .await
        .unwrap();
    assert_eq!(id, 1);

    let stored = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.email, "alice@example.com");
    assert!(stored.password_hash.starts_with("$2"));
    assert!(!stored.password_hash.contains("pw1-secret"));

    let err = service
        .register("alice@example.com", "another", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test_log::test(tokio::test)]
async fn test_register_race_still_conflicts() {
    let inner = InMemoryAccountRepository::new();
    let service = account_service(Arc::new(BlindLookup(inner)));

    service.register("bob@example.com", "first-pass", "").await.unwrap();
    let err = service
        .register("bob@example.com", "second-pass", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test_log::test(tokio::test)]
async fn test_login_errors_do_not_reveal_which_part_failed() {
    let tokens = issuer();
    let service = AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        PasswordHasher::new(4),
        tokens.clone(),
    );
    let id = service
        .register("carol@example.com", "carol-pass", "")
        .await
        .unwrap();

    let token = service.login("CAROL@example.com", "carol-pass").await.unwrap();
    let claims = tokens.validate(&token).unwrap();
    assert_eq!(claims.account_id(), id);
    assert_eq!(claims.email, "carol@example.com");

    for (email, password) in [
        ("carol@example.com", "wrong-pass"),
        ("nobody@example.com", "carol-pass"),
    ] {
        match service.login(email, password).await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_CREDENTIALS_MESSAGE),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_passwords_over_72_bytes_are_refused() {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let service = account_service(repo.clone());
    let prefix = "é".repeat(36);

    let err = service
        .register("erin@example.com", &format!("{}first-suffix", prefix), "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(repo.find_by_email("erin@example.com").await.unwrap().is_none());

    service.register("erin@example.com", &prefix, "").await.unwrap();
    assert!(service.login("erin@example.com", &prefix).await.is_ok());
    for longer in [
        format!("{}first-suffix", prefix),
        format!("{}totally-different", prefix),
    ] {
        assert!(matches!(
            service.login("erin@example.com", &longer).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}

#[test_log::test(tokio::test)]
async fn test_get_account() {
    let service = account_service(Arc::new(InMemoryAccountRepository::new()));
    let id = service
        .register("dave@example.com", "dave-pass", "hello")
        .await
        .unwrap();

    let account = service.get(id).await.unwrap();
    assert_eq!(account.description, "hello");
    assert!(matches!(service.get(id + 1).await, Err(AppError::NotFound(_))));
}

#[test_log::test(tokio::test)]
async fn test_task_lifecycle() {
    let service = task_service();

    let created = service.create(1, "Buy milk", "").await.unwrap();
    assert_eq!(created.owner_id, 1);
    assert!(!created.status);

    let completed = service.complete(created.id, 1).await.unwrap();
    assert!(completed.status);
    assert_eq!(completed.title, "Buy milk");
    assert_eq!(completed.description, "");
    assert_eq!(completed.created_at, created.created_at);

    service.delete(created.id, 1).await.unwrap();
    assert!(matches!(
        service.get(created.id, 1).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(created.id, 1).await,
        Err(AppError::NotFound(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_complete_is_a_single_repository_write() {
    let service = TaskService::new(Arc::new(CompleteOnly(InMemoryTaskRepository::new())));
    let task = service.create(1, "Buy milk", "2 litres").await.unwrap();

    let completed = service.complete(task.id, 1).await.unwrap();
    assert!(completed.status);
    assert_eq!(completed.title, "Buy milk");
    assert_eq!(completed.description, "2 litres");

    assert!(matches!(
        service.complete(task.id, 2).await,
        Err(AppError::NotFound(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_tasks_are_scoped_to_their_owner() {
    let service = task_service();
    let task = service.create(1, "Alice's", "private").await.unwrap();

    assert!(matches!(service.get(task.id, 2).await, Err(AppError::NotFound(_))));
    assert!(matches!(
        service.complete(task.id, 2).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update(TaskChanges {
                id: task.id,
                owner_id: 2,
                title: "mine now".into(),
                description: String::new(),
                status: true,
            })
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(task.id, 2).await,
        Err(AppError::NotFound(_))
    ));
    assert!(service.list(2).await.unwrap().is_empty());

    // Untouched for the owner.
    assert_eq!(service.get(task.id, 1).await.unwrap(), task);
}

#[test_log::test(tokio::test)]
async fn test_list_orders_by_id_descending() {
    let service = task_service();
    let t1 = service.create(1, "T1", "").await.unwrap();
    let t2 = service.create(1, "T2", "").await.unwrap();
    service.create(2, "other", "").await.unwrap();

    let listed = service.list(1).await.unwrap();
    assert_eq!(listed, vec![t2, t1]);
}

#[test_log::test(tokio::test)]
async fn test_stalled_store_times_out() {
    let service =
        TaskService::new(Arc::new(StalledTasks)).with_timeout(Duration::from_millis(20));

    assert!(matches!(service.list(1).await, Err(AppError::Timeout(_))));
    assert!(matches!(service.get(1, 1).await, Err(AppError::Timeout(_))));
    assert!(matches!(
        service.create(1, "never stored", "").await,
        Err(AppError::Timeout(_))
    ));
}
