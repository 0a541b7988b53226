use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Return the identity the middleware attached to this request.
pub async fn me(
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    let Extension(user) =
        user.ok_or_else(|| ApiError::Unauthorized("Unauthenticated".to_string()))?;

    Ok(ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseData {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
}

impl From<AuthenticatedUser> for MeResponseData {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id.0,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
