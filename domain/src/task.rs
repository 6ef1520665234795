//! Task use cases: extracting tasks from a transcript and managing a user's stored tasks.

use crate::error::Error;
use crate::gateway::gemini::GeminiClient;
use crate::{priority::Priority, status::Status, tasks, Id};
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use task_ai::traits::generation::Provider;
use task_ai::{Extractor, TaskDraft};
use tokio_util::sync::CancellationToken;

pub use entity_api::task::{find_by_id_and_user, find_by_user};

/// Tasks stored instead of calling the model when mock mode is on.
const MOCK_TASKS: [(&str, Priority); 2] = [
    ("Follow up on payment bug", Priority::High),
    ("Schedule investigation meeting", Priority::Medium),
];

/// Extracts tasks from `transcript` and stores them for `user_id`.
///
/// Mock mode stores the canned demo tasks without looking at the transcript. A blank
/// transcript yields no tasks and never contacts the model.
pub async fn generate(
    db: &DatabaseConnection,
    config: &Config,
    user_id: Id,
    transcript: &str,
    cancel: &CancellationToken,
) -> Result<Vec<tasks::Model>, Error> {
    if config.gemini_mock {
        info!("Mock mode enabled, storing demo tasks for user {user_id}");
        let drafts = MOCK_TASKS
            .iter()
            .map(|(text, priority)| task_model(text, None, None, *priority))
            .collect();
        return Ok(entity_api::task::create_many(db, drafts, user_id).await?);
    }

    if transcript.trim().is_empty() {
        debug!("Empty transcript submitted by user {user_id}");
        return Ok(Vec::new());
    }

    let client = GeminiClient::from_config(config)?;
    generate_with_provider(db, config, &client, user_id, transcript, cancel).await
}

/// Runs the extraction pipeline against `provider` and stores the resulting drafts.
pub async fn generate_with_provider(
    db: &DatabaseConnection,
    config: &Config,
    provider: &dyn Provider,
    user_id: Id,
    transcript: &str,
    cancel: &CancellationToken,
) -> Result<Vec<tasks::Model>, Error> {
    let extraction_config = config.extraction_config();
    let drafts = Extractor::new(provider, &extraction_config)
        .extract(transcript, &config.candidate_models, cancel)
        .await?;

    info!("Extracted {} task(s) for user {user_id}", drafts.len());
    let models = drafts.into_iter().map(from_draft).collect();
    Ok(entity_api::task::create_many(db, models, user_id).await?)
}

/// Marks the caller's task completed; `NotFound` when it is not theirs.
pub async fn complete(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<tasks::Model, Error> {
    Ok(entity_api::task::update_status(db, id, user_id, Status::Completed).await?)
}

/// Deletes the caller's task. Deleting a missing or foreign task is a no-op.
pub async fn delete(db: &DatabaseConnection, id: Id, user_id: Id) -> Result<(), Error> {
    let deleted = entity_api::task::delete_by_id_and_user(db, id, user_id).await?;
    if deleted == 0 {
        debug!("No task {id} owned by user {user_id} to delete");
    }
    Ok(())
}

fn from_draft(draft: TaskDraft) -> tasks::Model {
    let priority = match draft.priority {
        task_ai::Priority::High => Priority::High,
        task_ai::Priority::Medium => Priority::Medium,
        task_ai::Priority::Low => Priority::Low,
    };
    task_model(&draft.text, draft.assignee, draft.due, priority)
}

fn task_model(
    text: &str,
    assignee: Option<String>,
    due: Option<String>,
    priority: Priority,
) -> tasks::Model {
    let now = chrono::Utc::now();
    tasks::Model {
        id: Default::default(),
        user_id: Default::default(),
        text: text.to_string(),
        assignee,
        due,
        priority,
        status: Status::Pending,
        created_at: now.into(),
        updated_at: now.into(),
    }
}
