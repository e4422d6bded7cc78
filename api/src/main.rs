use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use wa_api::{app::create_app, routes::AppState, telemetry::init_tracing};
use wa_core::repositories::{TimedTokenRepository, TimedUserRepository};
use wa_core::services::token::{TokenService, TokenServiceConfig};
use wa_infra::database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use wa_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting wallet auth API server");

    // Store
    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    pool.ensure_schema()
        .await
        .context("Failed to prepare the database schema")?;

    let token_repository = Arc::new(TimedTokenRepository::new(
        MySqlTokenRepository::new(pool.get_pool().clone()),
        pool.operation_timeout(),
    ));
    let user_repository = Arc::new(TimedUserRepository::new(
        MySqlUserRepository::new(pool.get_pool().clone()),
        pool.operation_timeout(),
    ));

    // Services
    let token_service = Arc::new(
        TokenService::new(
            token_repository,
            TokenServiceConfig::from_auth_config(&config.auth),
        )
        .context("Invalid token service configuration")?,
    );

    let reaper = Arc::new(token_service.reaper(
        Duration::from_secs(config.auth.reaper.interval),
        config.auth.reaper.enabled,
    ));
    let reaper_handle = reaper.start_background_task();

    let app_state = web::Data::new(AppState::new(
        user_repository,
        token_service,
        Arc::new(pool.clone()),
    ));

    let bind_address = config.server.bind_address();
    info!(%bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(handle) = reaper_handle {
        handle.abort();
    }
    pool.close().await;

    Ok(())
}
