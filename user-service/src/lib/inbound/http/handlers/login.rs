use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenData;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Exchange email and password for a session token and cookie.
pub async fn login<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequestBody>, ApiError>,
) -> Result<(CookieJar, ApiSuccess<TokenData>), ApiError> {
    let command = LoginCommand::new(body.email, body.password).map_err(UserError::from)?;

    let (jar, token) = state
        .auth_service
        .login(command, jar)
        .await
        .map_err(ApiError::from_login_error)?;

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            TokenData {
                message: "Login successful".to_string(),
                token,
            },
        ),
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}
