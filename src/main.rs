use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use taskvault::{
    auth::{PasswordHasher, TokenIssuer},
    config::Config,
    db,
    repository::{PgAccountRepository, PgTaskRepository},
    routes::{self, health},
    services::{AccountService, TaskService},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    log::debug!("loaded {:?}", config);

    let pool = db::connect(&config.database_url, &config.pool)
        .await
        .map_err(|e| {
            log::error!("failed to connect to database: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
        })?;
    db::migrate(&pool).await.map_err(|e| {
        log::error!("failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let issuer = Arc::new(TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        chrono::Duration::hours(config.token_ttl_hours),
    ));
    let account_service = web::Data::new(
        AccountService::new(
            Arc::new(PgAccountRepository::new(pool.clone())),
            PasswordHasher::new(config.bcrypt_cost),
            issuer.clone(),
        )
        .with_timeout(config.request_timeout),
    );
    let task_service = web::Data::new(
        TaskService::new(Arc::new(PgTaskRepository::new(pool.clone())))
            .with_timeout(config.request_timeout),
    );
    let issuer = web::Data::from(issuer);

    log::info!("Starting taskvault server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(account_service.clone())
            .app_data(task_service.clone())
            .app_data(issuer.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
