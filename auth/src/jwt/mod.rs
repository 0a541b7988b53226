pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use claims::UserClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use handler::SIGNING_ALGORITHM;
