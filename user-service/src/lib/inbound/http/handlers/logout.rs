use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Clear the session cookie. Needs no credentials.
pub async fn logout<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<MessageData>), ApiError> {
    let jar = state.auth_service.logout(jar).await?;

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            MessageData {
                message: "Successfully logged out".to_string(),
            },
        ),
    ))
}
