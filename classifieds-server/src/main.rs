mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use anyhow::Context;
use application::auth_service::AuthService;
use application::classified_service::ClassifiedService;
use data::classified_repository::PostgresClassifiedRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let classified_repo = Arc::new(PostgresClassifiedRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        user_repo.clone(),
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
    );
    let classified_service = ClassifiedService::new(classified_repo, user_repo);

    server::start_rest_server(config, auth_service, classified_service).await
}
