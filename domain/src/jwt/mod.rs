//! Issuing and verifying the bearer tokens that authenticate API requests.
//!
//! Tokens are HS256 JWTs signed with the configured `jwt_secret`. They carry the user's
//! email as subject and expire after `access_token_expiry_seconds`.

use crate::error::{EntityErrorKind, Error};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use service::config::Config;

pub use claims::AccessClaims;

pub(crate) mod claims;

/// Issues a signed access token for `email`.
pub fn issue_access_token(config: &Config, email: &str) -> Result<String, Error> {
    let exp = Utc::now().timestamp().max(0) as u64 + config.access_token_expiry_seconds;
    let claims = AccessClaims {
        sub: email.to_string(),
        exp,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret().as_bytes()),
    )?)
}

/// Verifies the signature and expiry of `token` and returns its claims.
///
/// Any failure is reported as `Unauthenticated`.
pub fn decode_access_token(config: &Config, token: &str) -> Result<AccessClaims, Error> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| {
        debug!("Rejected access token: {err}");
        Error {
            source: Some(Box::new(err)),
            ..Error::entity(EntityErrorKind::Unauthenticated)
        }
    })
}
