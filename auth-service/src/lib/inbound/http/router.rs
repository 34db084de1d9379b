use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::whoami::whoami;
use super::middleware::require_session;
use crate::domain::user::ports::LoginServicePort;

#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<dyn LoginServicePort>,
    pub cookie_secure: bool,
}

/// Transport-level knobs for the HTTP surface.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Browser origins allowed to send credentialed requests. Empty means
    /// any origin, without credentials.
    pub cors_origins: Vec<HeaderValue>,
}

pub fn create_router(
    login_service: Arc<dyn LoginServicePort>,
    authenticator: Arc<Authenticator>,
    settings: HttpSettings,
) -> Router {
    let state = AppState {
        login_service,
        cookie_secure: settings.cookie_secure,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(
            authenticator,
            require_session,
        ));

    // Headers are left out of the span: they carry the session cookie.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .nest("/protected", protected_routes)
        .layer(trace_layer)
        .layer(cors_layer(&settings.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}
