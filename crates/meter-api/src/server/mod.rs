//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use meter_common::{AppConfig, AppError, JwtService, StorageBackend};
use meter_db::{apply_schema, create_pool, MemoryStore, PgCustomerRepository, PgUserRepository};
use meter_service::{RetryPolicy, ServiceContextBuilder, UserService};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes are merged after the middleware so probes are never rate limited.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let tariff = config
        .tariff
        .schedule()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.algorithm,
        config.jwt.access_token_expiry,
    ));

    let builder = ServiceContextBuilder::new()
        .jwt_service(jwt_service)
        .tariff(tariff)
        .retry(RetryPolicy::from_config(&config.retry));

    // Create repositories for the configured backend
    let builder = match config.storage {
        StorageBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&meter_db::DatabaseConfig::from(db))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            apply_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            builder
                .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
                .customer_repo(Arc::new(PgCustomerRepository::new(pool.clone())))
                .pool(pool)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; records are lost on shutdown");
            let store = MemoryStore::new();
            builder
                .user_repo(Arc::new(store.user_repository()))
                .customer_repo(Arc::new(store.customer_repository()))
        }
    };

    // Build service context
    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    if let Some(admin) = &config.bootstrap_admin {
        let created = UserService::new(&service_context)
            .ensure_bootstrap_admin(admin)
            .await?;
        if !created {
            info!(email = %admin.email, "Bootstrap administrator already present");
        }
    }

    Ok(AppState::new(service_context, config))
}

/// Bind the configured address
pub async fn bind(config: &AppConfig) -> Result<TcpListener, AppError> {
    let addr = config.api.address();
    TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))
}

/// Serve the application on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    if let Some(addr) = addr {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let listener = bind(&config).await?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    serve(listener, app).await
}
