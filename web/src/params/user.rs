use domain::user::Session;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterParams {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginParams {
    pub email: String,
    pub password: String,
}

/// Returned by register and login. Pass `access_token` back as
/// `Authorization: Bearer <access_token>` on every protected call.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// The user's name, or their email when no name was given
    pub user: String,
}

impl From<Session> for TokenResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user.display_name().to_string(),
            access_token: session.access_token,
            token_type: "bearer".to_string(),
        }
    }
}
