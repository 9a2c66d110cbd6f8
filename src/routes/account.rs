use crate::{auth::AuthenticatedAccountId, error::AppError, services::AccountService};
use actix_web::{get, web, HttpResponse, Responder};

/// Returns the caller's own account. The password hash is never serialized.
#[get("/me")]
pub async fn me(
    accounts: web::Data<AccountService>,
    caller: AuthenticatedAccountId,
) -> Result<impl Responder, AppError> {
    let account = accounts.get(caller.0).await?;
    Ok(HttpResponse::Ok().json(account))
}
