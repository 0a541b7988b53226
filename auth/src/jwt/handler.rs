use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

/// The only algorithm tokens are signed and accepted with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Signs with HS512 and accepts nothing else.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `issuer` - Required value of the `iss` claim on decode
    ///
    /// # Security Notes
    /// - The secret should be at least 512 bits (64 bytes) for HS512
    /// - Load it once at startup from configuration; it is never read again
    pub fn new(secret: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);
        validation.set_issuer(&[issuer]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `SigningFailed` - Serialization or signing failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(SIGNING_ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// # Errors
    /// * `TokenInvalid` - Malformed token, bad signature, wrong issuer or any
    ///   algorithm other than HS512
    /// * `TokenExpired` - Signature is valid but now is before `nbf` or after `exp`
    /// * `MissingClaims` - Signature is valid but the payload does not match `T`
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::TokenInvalid(e.to_string()))?;

        if header.alg != SIGNING_ALGORITHM {
            return Err(JwtError::TokenInvalid(format!(
                "unexpected signing algorithm: {:?}",
                header.alg
            )));
        }

        let token_data =
            decode::<T>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                        JwtError::TokenExpired
                    }
                    ErrorKind::Json(_) => JwtError::MissingClaims(e.to_string()),
                    _ => JwtError::TokenInvalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
