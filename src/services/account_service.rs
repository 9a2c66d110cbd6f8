use std::sync::Arc;
use std::time::Duration;

use super::{blocking, within, DEFAULT_OPERATION_TIMEOUT};
use crate::auth::{PasswordHasher, TokenIssuer};
use crate::error::AppError;
use crate::models::{normalize_email, Account, NewAccount};
use crate::repository::{AccountRepository, ACCOUNT_EXISTS_MESSAGE};

/// Single message for every failed login, whatever the reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Verified against when the email is unknown, so both failed-login paths pay
/// for one bcrypt round at the configured cost.
const DUMMY_PASSWORD: &str = "taskvault-dummy-password";

/// Registration and login.
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    timeout: Duration,
    dummy_hash: Arc<str>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        let dummy_hash = hasher.hash_password(DUMMY_PASSWORD).unwrap_or_else(|e| {
            log::error!("could not prepare dummy password hash: {}", e);
            String::new()
        });
        Self {
            accounts,
            hasher,
            tokens,
            timeout: DEFAULT_OPERATION_TIMEOUT,
            dummy_hash: dummy_hash.into(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates an account and returns its id.
    ///
    /// The lookup below only saves a bcrypt round for obvious duplicates. Two
    /// concurrent registrations can both pass it; the repository's uniqueness
    /// constraint then rejects the loser with the same `Conflict`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        description: &str,
    ) -> Result<i64, AppError> {
        let email = normalize_email(email);

        let existing = within(self.timeout, self.accounts.find_by_email(&email)).await?;
        if existing.is_some() {
            return Err(AppError::Conflict(ACCOUNT_EXISTS_MESSAGE.into()));
        }

        let hasher = self.hasher;
        let password = password.to_owned();
        let password_hash = blocking(move || hasher.hash_password(&password)).await?;
        let account_id = within(
            self.timeout,
            self.accounts.insert(NewAccount {
                email,
                password_hash,
                description: description.to_string(),
            }),
        )
        .await?;

        log::info!("registered account {}", account_id);
        Ok(account_id)
    }

    /// Checks credentials and returns a signed token.
    ///
    /// An unknown email and a wrong password produce the same error after the
    /// same amount of bcrypt work.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);

        let account = within(self.timeout, self.accounts.find_by_email(&email)).await?;
        let stored_hash: Arc<str> = match &account {
            Some(account) => account.password_hash.as_str().into(),
            None => self.dummy_hash.clone(),
        };

        let hasher = self.hasher;
        let password = password.to_owned();
        let matches =
            blocking(move || Ok(hasher.verify_password(&password, &stored_hash))).await?;

        let account = match account {
            Some(account) if matches => account,
            _ => return Err(invalid_credentials()),
        };

        let token = self.tokens.issue(account.id, &account.email)?;
        log::info!("account {} logged in", account.id);
        Ok(token)
    }

    /// Loads the caller's own account.
    pub async fn get(&self, account_id: i64) -> Result<Account, AppError> {
        within(self.timeout, self.accounts.find_by_id(account_id))
            .await?
            .ok_or_else(|| AppError::NotFound("account not found".into()))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryAccountRepository;
    use std::time::Instant;

    fn service(cost: u32) -> AccountService {
        AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            PasswordHasher::new(cost),
            Arc::new(TokenIssuer::new(b"account-service-secret", chrono::Duration::hours(1))),
        )
    }

    #[test]
    fn test_dummy_hash_uses_configured_cost() {
        let service = service(5);
        assert!(service.dummy_hash.starts_with("$2b$05$"));
        assert!(service.hasher.verify_password(DUMMY_PASSWORD, &service.dummy_hash));
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_bcrypt_round() {
        let service = service(8);
        service
            .register("known@example.com", "right-password", "")
            .await
            .unwrap();

        let started = Instant::now();
        let known = service.login("known@example.com", "wrong-password").await;
        let known_elapsed = started.elapsed();

        let started = Instant::now();
        let unknown = service.login("unknown@example.com", "wrong-password").await;
        let unknown_elapsed = started.elapsed();

        assert!(matches!(known, Err(AppError::Unauthorized(_))));
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
        // Without the dummy verify the unknown path is a map lookup: microseconds
        // against milliseconds.
        assert!(
            unknown_elapsed * 4 >= known_elapsed,
            "unknown email took {:?}, known email took {:?}",
            unknown_elapsed,
            known_elapsed
        );
    }

    #[tokio::test]
    async fn test_login_with_dummy_password_never_succeeds() {
        let service = service(4);
        assert!(matches!(
            service.login("ghost@example.com", DUMMY_PASSWORD).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
