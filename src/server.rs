//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and mapping backend selection, and the
//! Axum server lifecycle.

use crate::config::{CacheBackendKind, Config};
use crate::infrastructure::cache::{CacheBackend, CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::geocoding::{Geocoder, GoogleMapsClient};
use crate::routes::app_router;
use crate::state::{AppState, AuthSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

const DB_CONNECT_ATTEMPTS: usize = 5;
const MAX_CONNECT_DELAY: Duration = Duration::from_secs(5);

/// Opens the connection pool, retrying with exponential backoff so the
/// service survives starting before the database.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let pool = Retry::start(connect_backoff(), || {
        let options = options.clone();
        async move {
            options.connect(&config.database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")?;

    Ok(pool)
}

/// Jittered delays between connection attempts, each capped at 5 seconds.
fn connect_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(200)
        .max_delay(MAX_CONNECT_DELAY)
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS)
}

/// Picks the cache backend. A Redis outage at startup degrades to
/// [`NullCache`] instead of failing the service.
pub async fn build_cache(config: &Config) -> CacheService {
    let backend: Arc<dyn CacheBackend> = match (config.cache_backend, &config.redis_url) {
        (CacheBackendKind::Redis, Some(redis_url)) => {
            match RedisCache::connect(redis_url, config.cache_key_prefix.clone()).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                    Arc::new(NullCache::new())
                }
            }
        }
        (CacheBackendKind::Redis, None) => {
            tracing::info!("REDIS_URL not set, cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
        (CacheBackendKind::Memory, _) => {
            tracing::info!("Cache enabled (in-memory)");
            Arc::new(MemoryCache::new())
        }
        (CacheBackendKind::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    };

    CacheService::new(backend, Duration::from_secs(config.cache_ttl_seconds))
}

/// Builds the mapping client when an API key is configured.
pub fn build_geocoder(config: &Config) -> Result<Option<Arc<dyn Geocoder>>> {
    let Some(api_key) = &config.maps_api_key else {
        tracing::info!("GOOGLE_MAPS_API_KEY not set, geocoding disabled");
        return Ok(None);
    };

    let client = GoogleMapsClient::new(
        &config.maps_base_url,
        api_key.clone(),
        Duration::from_secs(config.geocoding_timeout_seconds),
    )
    .context("Failed to build mapping client")?;

    tracing::info!("Geocoding enabled");
    Ok(Some(Arc::new(client)))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Cache backend (Redis, in-memory or NullCache)
/// - Mapping client (optional)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let cache = build_cache(&config).await;
    let geocoder = build_geocoder(&config)?;

    let state = AppState::new(
        Arc::new(pool),
        cache,
        geocoder,
        AuthSettings {
            signing_secret: config.token_signing_secret.clone(),
            session_ttl_hours: config.session_ttl_hours,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_backoff_is_bounded() {
        let delays: Vec<_> = connect_backoff().collect();
        assert_eq!(delays.len(), DB_CONNECT_ATTEMPTS);
        assert!(delays.iter().all(|d| *d <= MAX_CONNECT_DELAY));
    }
}
