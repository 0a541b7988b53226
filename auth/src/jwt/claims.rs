use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token payload.
///
/// Registered claims plus the user bundle. Every field is required, so a
/// payload missing any of them fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject (numeric user identifier)
    pub sub: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    #[serde(flatten)]
    pub user: UserClaims,
}

/// Identity fields carried inside a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserClaims {
    #[serde(rename = "user_id")]
    pub id: i64,

    #[serde(rename = "user_Name")]
    pub name: String,

    #[serde(rename = "user_LastName")]
    pub last_name: String,

    #[serde(rename = "user_Email")]
    pub email: String,
}

impl Claims {
    /// Create claims for a user, issued now.
    ///
    /// # Arguments
    /// * `user` - Identity fields to embed
    /// * `issuer` - Value of the `iss` claim
    /// * `lifetime` - Time between issuance and expiry
    pub fn for_user(user: UserClaims, issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self::issued_at(user, issuer, Utc::now(), lifetime)
    }

    /// Create claims for a user with an explicit issuance instant.
    ///
    /// `iat` and `nbf` are both set to `issued_at`; `exp` is `issued_at + lifetime`.
    pub fn issued_at(
        user: UserClaims,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let iat = issued_at.timestamp();

        Self {
            iss: issuer.into(),
            sub: user.id,
            iat,
            nbf: iat,
            exp: (issued_at + lifetime).timestamp(),
            user,
        }
    }
}
