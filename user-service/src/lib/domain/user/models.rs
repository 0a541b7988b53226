use std::fmt;
use std::str::FromStr;

use crate::user::errors::ValidationError;

/// User aggregate entity.
///
/// `password_hash` always holds a PHC hash once persisted, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Store-assigned numeric user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidUserId` - Not a base-10 integer
    pub fn from_string(s: &str) -> Result<Self, ValidationError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|_| ValidationError::InvalidUserId(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored exactly as
/// given; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `MissingField` - Email is empty
    /// * `InvalidEmail` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| ValidationError::InvalidEmail(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fields needed to persist a new user; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Login input. Lives only for the duration of one login call.
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    /// # Errors
    /// * `MissingField` - Email or password is empty
    pub fn new(email: String, password: String) -> Result<Self, ValidationError> {
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }

        Ok(Self { email, password })
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to register a new user with domain types
pub struct RegisterCommand {
    pub name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `name` - Display name
    /// * `last_name` - Family name
    /// * `email` - Raw email, validated here
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Errors
    /// * `MissingField` - Any field is empty
    /// * `InvalidEmail` - Email is malformed
    pub fn new(
        name: String,
        last_name: String,
        email: String,
        password: String,
    ) -> Result<Self, ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if last_name.is_empty() {
            return Err(ValidationError::MissingField("lastName"));
        }
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }

        Ok(Self {
            name,
            last_name,
            email,
            password,
        })
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated; an empty password counts as not provided.
pub struct UpdateUserCommand {
    pub id: UserId,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<EmailAddress>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserCommand {
    /// An update of `id` that changes nothing yet.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            last_name: None,
            email: None,
            avatar: None,
            password: None,
        }
    }
}

impl fmt::Debug for UpdateUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserCommand")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("avatar", &self.avatar)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<&User> for auth::UserClaims {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
        }
    }
}
