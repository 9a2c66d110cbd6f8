//! Use-case services.
//!
//! Services sit between the HTTP handlers and the repositories. They own the
//! business rules (email uniqueness, credential checks, owner scoping) and put
//! every storage call under an operation deadline.

pub mod account_service;
pub mod task_service;

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

pub use account_service::AccountService;
pub use task_service::TaskService;

/// Default deadline for a single service operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `operation`, giving up with `AppError::Timeout` once `limit` elapses.
///
/// The operation future is dropped on expiry, which cancels any in-flight query.
pub(crate) async fn within<T, F>(limit: Duration, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(limit, operation).await?
}

/// Runs CPU-heavy work (bcrypt) on the blocking pool so the async worker stays free.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalServerError(format!("blocking task failed: {}", e)))?
}
