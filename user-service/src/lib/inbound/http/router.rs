use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::middleware::authenticate;
use crate::domain::user::ports::AuthServicePort;

pub struct AppState<S>
where
    S: AuthServicePort,
{
    pub auth_service: Arc<S>,
}

impl<S> Clone for AppState<S>
where
    S: AuthServicePort,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
        }
    }
}

/// Build the HTTP application.
///
/// `authenticator` must be the same instance (or share the secret and issuer
/// of the one) the service issues tokens with.
pub fn create_router<S>(auth_service: Arc<S>, authenticator: Arc<Authenticator>) -> Router
where
    S: AuthServicePort,
{
    let state = AppState { auth_service };

    let public_routes = Router::new()
        .route("/login", post(login::<S>))
        .route("/register", post(register::<S>))
        .route("/logout", post(logout::<S>));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route("/user/:id", put(update_user::<S>))
        .route_layer(middleware::from_fn_with_state(authenticator, authenticate));

    // Authorization and Cookie headers carry credentials; leave them out of spans.
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
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
