use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;

/// HTTP request body for updating a user (raw JSON)
///
/// Absent and empty fields both mean "leave unchanged".
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

fn supplied(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl UpdateUserRequest {
    fn try_into_command(self, id: UserId) -> Result<UpdateUserCommand, UserError> {
        let email = supplied(self.email).map(EmailAddress::new).transpose()?;

        Ok(UpdateUserCommand {
            id,
            name: supplied(self.name),
            last_name: supplied(self.last_name),
            email,
            avatar: supplied(self.avatar),
            password: supplied(self.password),
        })
    }
}

/// Response body for user operations
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            name: user.name,
            last_name: user.last_name,
            email: user.email.as_str().to_string(),
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UpdateUserResponseData {
    pub message: String,
    pub user: UserResponse,
}

pub async fn update_user<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<ApiSuccess<UpdateUserResponseData>, ApiError> {
    // Parse user ID and request at HTTP boundary - errors automatically converted
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let command = req.try_into_command(user_id)?;

    state
        .auth_service
        .update_user(command)
        .await
        .map_err(ApiError::from)
        .map(|user| {
            ApiSuccess::new(
                StatusCode::OK,
                UpdateUserResponseData {
                    message: "Successfully updated the user".to_string(),
                    user: user.into(),
                },
            )
        })
}
