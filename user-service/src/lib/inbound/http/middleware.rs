use std::sync::Arc;

use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::HeaderValue;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::user::errors::UserError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to a request whose bearer token validated.
///
/// Lives in the request extensions for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub email: String,
}

impl From<auth::Claims> for AuthenticatedUser {
    fn from(claims: auth::Claims) -> Self {
        Self {
            id: UserId(claims.user.id),
            name: claims.user.name,
            last_name: claims.user.last_name,
            email: claims.user.email,
        }
    }
}

/// Middleware that validates the bearer token and adds the caller's identity
/// to request extensions. No handler runs when validation fails.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = identify(&authenticator, req.headers().get(AUTHORIZATION))?;

    tracing::debug!(user_id = %user.id, "Request authenticated");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Resolve an `Authorization` header value to the identity its token carries.
///
/// # Errors
/// * `Unauthenticated` - Header absent, not a bearer credential, or token rejected
pub fn identify(
    authenticator: &Authenticator,
    header: Option<&HeaderValue>,
) -> Result<AuthenticatedUser, UserError> {
    let header = header.ok_or_else(|| {
        tracing::debug!("Authorization header absent");
        UserError::Unauthenticated("Missing Authorization header".to_string())
    })?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Authorization header is not a bearer credential");
            UserError::Unauthenticated("Missing bearer token".to_string())
        })?;

    let claims = authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        match e {
            JwtError::MissingClaims(_) => {
                UserError::Unauthenticated("Invalid token data".to_string())
            }
            _ => UserError::Unauthenticated("Invalid token".to_string()),
        }
    })?;

    Ok(claims.into())
}
