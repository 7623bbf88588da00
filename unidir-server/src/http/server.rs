//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the pool is closed

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Uri};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::auth::{AuthConfig, TokenIssuer};
use crate::db::migrations;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_permissive: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenIssuer,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(pool: PgPool, auth: AuthConfig) -> Self {
        Self {
            pool,
            tokens: TokenIssuer::new(&auth),
            auth,
        }
    }
}

/// `http(s)://localhost` or `127.0.0.1`, any port.
fn is_local_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = rest.split(':').next().unwrap_or(rest);
    matches!(host, "localhost" | "127.0.0.1")
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin.to_str().map(is_local_origin).unwrap_or(false)
        }))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: "route",
        id: uri.path().to_string(),
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::admin::router())
        .merge(routes::users::router())
        .merge(routes::departments::router())
        .merge(routes::faculty::router())
        .merge(routes::images::router())
        .merge(routes::memberships::router())
        .fallback(fallback)
        .layer(cors_layer(cors_permissive))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// Creates the schema if needed, serves until a shutdown signal, then
/// closes the pool.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// run_server(pool, AuthConfig::default(), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    pool: PgPool,
    auth: AuthConfig,
    config: ServerConfig,
) -> Result<(), ServerError> {
    migrations::run(&pool).await?;

    let app = build_router(AppState::new(pool.clone(), auth), config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // Never connects; only routes that skip the database are exercised
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let auth = AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        };
        build_router(AppState::new(pool, auth), false)
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn local_origins() {
        assert!(is_local_origin("http://localhost:5173"));
        assert!(is_local_origin("http://127.0.0.1:3000"));
        assert!(is_local_origin("http://localhost"));
        assert!(!is_local_origin("https://example.com"));
        assert!(!is_local_origin("http://localhost.evil.com"));
        assert!(!is_local_origin("localhost:3000"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (status, body) = send(Request::get("/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn admin_route_without_token_is_401() {
        let request = Request::post("/departments")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Physics"}"#))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");
    }

    #[tokio::test]
    async fn admin_route_with_garbage_token_is_401() {
        let request = Request::delete("/faculty/7")
            .header("authorization", "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn visitor_token_is_403() {
        let issuer = TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret".into(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        });
        let visitor = crate::db::User {
            id: 1,
            email: "visitor@fsu.edu".into(),
            role: crate::models::Role::Visitor,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let token = issuer.issue(&visitor).unwrap();

        let request = Request::get("/users")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn non_integer_id_is_400() {
        let (status, body) =
            send(Request::get("/departments/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
