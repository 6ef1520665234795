use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::users;
use log::*;

pub(crate) struct AuthenticatedUser(pub users::Model);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // Resolves the `Authorization: Bearer <token>` header to a user. A missing or malformed
    // header, an invalid or expired token and a token for an unknown user are all 401.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| {
                debug!("Request without a bearer token");
                unauthorized()
            })?;

        match domain::user::find_by_access_token(state.db_conn_ref(), &state.config, token).await
        {
            Ok(user) => Ok(AuthenticatedUser(user)),
            Err(e) => {
                warn!("Rejected access token: {e}");
                Err(unauthorized())
            }
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized() -> RejectionType {
    (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
}
