#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    test, web, App,
};
use serde_json::json;
use taskvault::{
    auth::{PasswordHasher, TokenIssuer},
    repository::{InMemoryAccountRepository, InMemoryTaskRepository},
    routes::{self, health},
    services::{AccountService, TaskService},
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Everything an app instance needs, backed by in-memory repositories.
pub struct TestState {
    pub issuer: Arc<TokenIssuer>,
    pub accounts: web::Data<AccountService>,
    pub tasks: web::Data<TaskService>,
}

impl TestState {
    pub fn new() -> Self {
        let issuer = Arc::new(TokenIssuer::new(TEST_SECRET, chrono::Duration::hours(24)));
        let accounts = web::Data::new(AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            PasswordHasher::new(4),
            issuer.clone(),
        ));
        let tasks = web::Data::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())));
        Self {
            issuer,
            accounts,
            tasks,
        }
    }
}

pub async fn init_app(
    state: &TestState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(state.accounts.clone())
            .app_data(state.tasks.clone())
            .app_data(web::Data::from(state.issuer.clone()))
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

/// Registers and logs in; returns `(account_id, token)`.
pub async fn register_and_login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> (i64, String) {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password, "description": "" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let account_id = body["account_id"].as_i64().expect("account_id in response");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token in response").to_string();

    (account_id, token)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
