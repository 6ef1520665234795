use crate::controller::ApiResponse;
use crate::params::user::{LoginParams, RegisterParams, TokenResponse};
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::user as UserApi;
use log::*;

/// Creates an account and signs it in.
///
/// The returned token is passed back on every protected call, e.g.:
/// curl -v --header "Authorization: Bearer <access_token>" --request GET http://localhost:4000/tasks
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterParams,
    responses(
        (status = 200, description = "Registered and signed in", body = TokenResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Unprocessable Entity")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(params): Json<RegisterParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register a new user");

    let session = UserApi::register(
        app_state.db_conn_ref(),
        &app_state.config,
        &params.email,
        &params.password,
        params.name,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TokenResponse::from(session),
    )))
}

/// Exchanges an email and password for a new access token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginParams,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(params): Json<LoginParams>,
) -> Result<impl IntoResponse, Error> {
    let session = UserApi::login(
        app_state.db_conn_ref(),
        &app_state.config,
        &params.email,
        &params.password,
    )
    .await
    .inspect_err(|_| warn!("Authentication failed for a login attempt"))?;

    trace!("Issued access token for user {}", session.user.id);

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TokenResponse::from(session),
    )))
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use crate::router::define_routes;
    use crate::AppState;
    use axum::{
        body::Body,
        extract::Request,
        http::{header::CONTENT_TYPE, StatusCode},
    };
    use clap::Parser;
    use domain::{users, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn user(password_hash: String) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "alice@example.com".to_string(),
            name: None,
            password: password_hash,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn json_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn config() -> Config {
        Config::parse_from(["insightboard"]).set_jwt_secret("test-secret".to_string())
    }

    #[tokio::test]
    async fn test_register_existing_email_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user("hash".to_string())]])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config(), &db));

        let response = app
            .oneshot(json_post(
                "/register",
                r#"{"email": "alice@example.com", "password": "s3cret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_login_returns_bearer_token() {
        let stored = user(domain::user::generate_hash("s3cret".to_string()));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![stored]])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config(), &db));

        let response = app
            .oneshot(json_post(
                "/login",
                r#"{"email": "alice@example.com", "password": "s3cret"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"]["token_type"], "bearer");
        assert_eq!(body["data"]["user"], "alice@example.com");
        assert!(body["data"]["access_token"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let stored = user(domain::user::generate_hash("s3cret".to_string()));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![stored]])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config(), &db));

        let response = app
            .oneshot(json_post(
                "/login",
                r#"{"email": "alice@example.com", "password": "guess"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
