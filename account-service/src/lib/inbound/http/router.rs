use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::admin_welcome;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::me::change_password;
use super::handlers::me::delete_me;
use super::handlers::me::get_me;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
}

pub fn create_router(user_service: Arc<dyn UserServicePort>) -> Router {
    let state = AppState { user_service };

    let public_routes = Router::new()
        .route("/api/v1/register", post(register))
        .route("/api/v1/login", post(login));

    let protected_routes = Router::new()
        .route("/api/v1/me", get(get_me).delete(delete_me))
        .route("/api/v1/me/password", patch(change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run outermost-first: authenticate, then the role check
    let admin_routes = Router::new()
        .route("/api/v1/admin", get(admin_welcome))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Authorization headers stay out of the request span
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
        .route("/health", get(health))
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
