pub mod account;
pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every `/api` route.
///
/// Expects `web::Data<AccountService>`, `web::Data<TaskService>` and
/// `web::Data<TokenIssuer>` in the application data. `/auth` is public; the
/// `/account` and `/tasks` scopes sit behind `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/account")
                .wrap(AuthMiddleware)
                .service(account::me),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::complete_task)
                .service(tasks::delete_task),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected request body: {}", err);
    AppError::BadRequest("invalid input".into()).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejected path parameter: {}", err);
    AppError::BadRequest("invalid task id".into()).into()
}
