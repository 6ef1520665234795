use crate::{controller::health_check_controller, params, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::controller::{task_controller, user_session_controller};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "InsightBoard API"
        ),
        paths(
            health_check_controller::health_check,
            user_session_controller::register,
            user_session_controller::login,
            task_controller::generate,
            task_controller::index,
            task_controller::complete,
            task_controller::delete,
        ),
        components(
            schemas(
                domain::tasks::Model,
                domain::users::Model,
                domain::priority::Priority,
                domain::status::Status,
                params::task::GenerateTasksParams,
                params::user::RegisterParams,
                params::user::LoginParams,
                params::user::TokenResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "insightboard", description = "Meeting transcript to task list API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our bearer token authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "access_token returned from a successful register or login",
                        ))
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_session_routes(app_state.clone()))
        .merge(task_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn user_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(user_session_controller::register))
        .route("/login", post(user_session_controller::login))
        .with_state(app_state)
}

// Every handler here takes an `AuthenticatedUser`, so no route layer is needed
// to reject anonymous callers.
fn task_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/generate-tasks", post(task_controller::generate))
        .route("/tasks", get(task_controller::index))
        .route("/tasks/{id}/complete", post(task_controller::complete))
        .route("/tasks/{id}", delete(task_controller::delete))
        .with_state(app_state)
}


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_db_tests {
    use super::*;
    use axum::{body::Body, extract::Request, http::StatusCode};
    use clap::Parser;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        define_routes(AppState::new(Config::parse_from(["insightboard"]), &db))
    }

    #[tokio::test]
    async fn test_health_check_is_public() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_task_routes_reject_anonymous_callers() {
        for (method, uri) in [
            ("GET", "/tasks".to_string()),
            ("POST", format!("/tasks/{}/complete", domain::Id::new_v4())),
            ("DELETE", format!("/tasks/{}", domain::Id::new_v4())),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(&uri)
                .body(Body::empty())
                .unwrap();
            let response = app().oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }
}
