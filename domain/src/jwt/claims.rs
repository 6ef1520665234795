//! Claims carried by access tokens.

use serde::{Deserialize, Serialize};

/// Claims of an access token issued at register/login.
///
/// `sub` is the user's email; `exp` is a Unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: u64,
}
