//! SchemaBrowserLayer - Main Axum integration layer
//!
//! This module provides the main entry point for integrating axum-schema-browser
//! into an Axum application.

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::create_api_router;
use crate::browser::Browser;
use crate::database::traits::QueryExecutor;

#[cfg(feature = "postgres")]
use crate::database::postgres::PostgresExecutor;

/// Main layer for integrating the schema browser into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use axum_schema_browser::SchemaBrowserLayer;
/// use sqlx::PgPool;
///
/// # async fn example() {
/// let pool = PgPool::connect("postgres://localhost/app").await.unwrap();
/// let browser = SchemaBrowserLayer::postgres("/api", pool);
/// let app = Router::new().merge(browser.into_router());
/// # }
/// ```
pub struct SchemaBrowserLayer<E: QueryExecutor> {
    base_path: String,
    browser: Browser<E>,
}

impl<E: QueryExecutor> SchemaBrowserLayer<E> {
    /// Create a new schema browser at the given base path
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the endpoints will be mounted (e.g., "/api");
    ///   empty or "/" mounts them at the root
    /// * `executor` - The query executor implementation
    pub fn new(base_path: impl Into<String>, executor: E) -> Self {
        Self::with_browser(base_path, Browser::new(executor))
    }

    /// Create a schema browser around an existing [`Browser`]
    pub fn with_browser(base_path: impl Into<String>, browser: Browser<E>) -> Self {
        Self {
            base_path: base_path.into(),
            browser,
        }
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router includes:
    /// - API endpoints at `{base_path}/*`
    /// - Permissive CORS middleware
    pub fn into_router(self) -> Router {
        let api_router = create_api_router(self.browser);
        let base_path = self.base_path.trim_end_matches('/');

        // Axum refuses to nest at the root
        let router = if base_path.is_empty() {
            api_router
        } else {
            Router::new().nest(base_path, api_router)
        };

        router.layer(CorsLayer::permissive())
    }
}

#[cfg(feature = "postgres")]
impl SchemaBrowserLayer<PostgresExecutor> {
    /// Create a new schema browser for PostgreSQL
    ///
    /// # Arguments
    ///
    /// * `base_path` - The URL path where the endpoints will be mounted
    /// * `pool` - The PostgreSQL connection pool
    pub fn postgres(base_path: impl Into<String>, pool: sqlx::PgPool) -> Self {
        Self::new(base_path, PostgresExecutor::new(pool))
    }
}
