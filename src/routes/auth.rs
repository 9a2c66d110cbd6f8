use crate::{
    auth::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
    error::AppError,
    services::AccountService,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new account
///
/// Creates an account and returns its id. A second registration with the same
/// email (compared case-insensitively) is answered with 409.
#[post("/register")]
pub async fn register(
    accounts: web::Data<AccountService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let account_id = accounts
        .register(
            &register_data.email,
            &register_data.password,
            &register_data.description,
        )
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse { account_id }))
}

/// Login
///
/// Checks email and password and returns a bearer token. Unknown emails and
/// wrong passwords get the same 401.
#[post("/login")]
pub async fn login(
    accounts: web::Data<AccountService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = accounts
        .login(&login_data.email, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
