use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::task::GenerateTasksParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::{task as TaskApi, Id};
use log::*;
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// POST extract tasks from a meeting transcript and store them for the caller.
///
/// Extraction runs on its own tokio task. When the client goes away before it finishes,
/// the extraction is cancelled at its next chunk boundary.
#[utoipa::path(
    post,
    path = "/generate-tasks",
    request_body = GenerateTasksParams,
    responses(
        (status = 201, description = "Successfully extracted and stored tasks", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "No candidate model worked, or the model API key is not set"),
        (status = 502, description = "The model API could not be reached")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<GenerateTasksParams>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST Generate Tasks for user {} from a {} byte transcript",
        user.id,
        params.transcript.len()
    );

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let extraction = tokio::spawn(async move {
        TaskApi::generate(
            app_state.db_conn_ref(),
            &app_state.config,
            user.id,
            &params.transcript,
            &cancel,
        )
        .await
    });

    let tasks = extraction.await.map_err(|e| {
        error!("Task extraction panicked or was aborted: {e:?}");
        DomainError {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Task extraction did not finish".to_string(),
            )),
        }
    })??;
    guard.disarm();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), tasks)),
    ))
}

/// GET all tasks belonging to the caller, oldest first.
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Successfully retrieved the caller's tasks", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Tasks for user {}", user.id);

    let tasks = TaskApi::find_by_user(app_state.db_conn_ref(), user.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tasks)))
}

/// POST mark one of the caller's tasks as completed.
#[utoipa::path(
    post,
    path = "/tasks/{id}/complete",
    params(
        ("id" = Id, Path, description = "Task id to complete")
    ),
    responses(
        (status = 200, description = "Successfully completed the task", body = domain::tasks::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn complete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Complete Task {id} for user {}", user.id);

    let task = TaskApi::complete(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// DELETE one of the caller's tasks. Succeeds even when there is nothing to delete.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = Id, Path, description = "Task id to delete")
    ),
    responses(
        (status = 200, description = "Task deleted or already absent"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Task {id} for user {}", user.id);

    TaskApi::delete(app_state.db_conn_ref(), id, user.id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
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
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, StatusCode},
        response::Response,
    };
    use clap::Parser;
    use domain::{priority::Priority, status::Status, tasks, users, Id};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn user() -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            password: "hash".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn task(user_id: Id, text: &str, priority: Priority) -> tasks::Model {
        let now = chrono::Utc::now();
        tasks::Model {
            id: Id::new_v4(),
            user_id,
            text: text.to_string(),
            assignee: None,
            due: None,
            priority,
            status: Status::Pending,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn config() -> Config {
        Config::parse_from(["insightboard"]).set_jwt_secret("test-secret".to_string())
    }

    fn bearer(config: &Config, user: &users::Model) -> String {
        let token = domain::jwt::issue_access_token(config, &user.email).unwrap();
        format!("Bearer {token}")
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_generate_tasks_in_mock_mode_returns_created() {
        let user = user();
        let config = config().set_gemini_mock(true);
        let authorization = bearer(&config, &user);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user.clone()]])
                .append_query_results(vec![vec![task(
                    user.id,
                    "Follow up on payment bug",
                    Priority::High,
                )]])
                .append_query_results(vec![vec![task(
                    user.id,
                    "Schedule investigation meeting",
                    Priority::Medium,
                )]])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config, &db));

        let request = Request::builder()
            .method("POST")
            .uri("/generate-tasks")
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"transcript": "Alice: anything"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 201);
        assert_eq!(body["data"][0]["text"], "Follow up on payment bug");
        assert_eq!(body["data"][1]["priority"], "Medium");
    }

    #[tokio::test]
    async fn test_generate_tasks_requires_bearer() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let app = define_routes(AppState::new(config(), &db));

        let request = Request::builder()
            .method("POST")
            .uri("/generate-tasks")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"transcript": "Alice: anything"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_complete_foreign_task_is_not_found() {
        let user = user();
        let config = config();
        let authorization = bearer(&config, &user);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user.clone()]])
                .append_query_results(vec![Vec::<tasks::Model>::new()])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config, &db));

        let request = Request::builder()
            .method("POST")
            .uri(format!("/tasks/{}/complete", Id::new_v4()))
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_absent_task_succeeds() {
        let user = user();
        let config = config();
        let authorization = bearer(&config, &user);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![user.clone()]])
                .append_exec_results(vec![MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let app = define_routes(AppState::new(config, &db));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/tasks/{}", Id::new_v4()))
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
