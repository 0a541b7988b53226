use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenData;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    WithRejection(Json(body), _): WithRejection<Json<RegisterRequestBody>, ApiError>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let command = RegisterCommand::new(body.name, body.last_name, body.email, body.password)
        .map_err(UserError::from)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|token| {
            ApiSuccess::new(
                StatusCode::CREATED,
                TokenData {
                    message: "User registered successfully".to_string(),
                    token,
                },
            )
        })
}

/// Missing keys deserialize as empty and are rejected by `RegisterCommand`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}
