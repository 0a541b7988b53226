use async_trait::async_trait;
use axum_extra::extract::cookie::CookieJar;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for authentication and session lifecycle operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials, issue a session token and set the session cookie.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password
    /// * `jar` - Response cookies the session cookie is added to
    ///
    /// # Returns
    /// The updated cookie jar and the issued token
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` / `StoreTimeout` - Store access failed
    /// * `SigningFailed` / `CookieWriteFailed` - Token or cookie could not be produced
    async fn login(
        &self,
        command: LoginCommand,
        jar: CookieJar,
    ) -> Result<(CookieJar, String), UserError>;

    /// Create a user and issue a session token. No cookie is set.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `HashingFailed` - Password could not be hashed
    /// * `StoreUnavailable` / `StoreTimeout` - Store access failed
    async fn register(&self, command: RegisterCommand) -> Result<String, UserError>;

    /// Apply a partial update and return the stored state afterwards.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist at update or re-fetch time
    /// * `HashingFailed` - New password could not be hashed
    /// * `StoreUnavailable` / `StoreTimeout` - Store access failed
    async fn update_user(&self, command: UpdateUserCommand) -> Result<User, UserError>;

    /// Clear the session cookie. Tokens already issued stay valid until expiry.
    ///
    /// # Errors
    /// * `CookieWriteFailed` - The clearing cookie could not be written
    async fn logout(&self, jar: CookieJar) -> Result<CookieJar, UserError>;
}

/// Persistence operations for user aggregate.
///
/// "Not found" is `Ok(None)`; only transport or storage failures are errors.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by exact (case-sensitive) email address.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Persist new user and assign its identifier.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email was registered concurrently
    /// * `StoreUnavailable` - Database operation failed
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;

    /// Overwrite an existing user's fields.
    ///
    /// # Returns
    /// The row as written, or `None` if no user has this id
    ///
    /// # Errors
    /// * `UserAlreadyExists` - New email belongs to another user
    /// * `StoreUnavailable` - Database operation failed
    async fn update(&self, user: User) -> Result<Option<User>, UserError>;
}
