//! Liveness and store connectivity

use actix_web::{web, HttpResponse};
use async_trait::async_trait;

use wa_core::repositories::{TokenRepository, UserRepository};
use wa_infra::database::{DatabasePool, PoolStatistics};

use super::AppState;

/// Connectivity check for the backing store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn is_healthy(&self) -> bool;

    /// Connection pool usage, when the store is pooled
    fn pool_statistics(&self) -> Option<PoolStatistics> {
        None
    }
}

#[async_trait]
impl StoreHealth for DatabasePool {
    async fn is_healthy(&self) -> bool {
        matches!(self.health_check().await, Ok(true))
    }

    fn pool_statistics(&self) -> Option<PoolStatistics> {
        Some(self.get_statistics())
    }
}

/// Handler for GET /health
///
/// # Response
///
/// - 200 OK: `{"status": "healthy", "database": "up", "pool": {...}, ...}`
/// - 503 Service Unavailable: `{"status": "degraded", "database": "down", ...}`
pub async fn health_check<U, R>(state: web::Data<AppState<U, R>>) -> HttpResponse
where
    U: UserRepository + 'static,
    R: TokenRepository + 'static,
{
    let database_up = state.store_health.is_healthy().await;

    let mut body = serde_json::json!({
        "status": if database_up { "healthy" } else { "degraded" },
        "database": if database_up { "up" } else { "down" },
        "service": "wallet-auth-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if let Some(stats) = state.store_health.pool_statistics() {
        if !database_up {
            tracing::warn!(%stats, "Store health check failed");
        }
        body["pool"] = serde_json::json!({
            "connections": stats.connections,
            "idle_connections": stats.idle_connections,
            "max_connections": stats.max_connections,
        });
    }

    if database_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
