use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    ConnectionTrait, QueryOrder, TransactionTrait, TryIntoModel,
};

use super::error::Error;
use entity::tasks::{ActiveModel, Column, Entity, Model};
use entity::{status::Status, Id};
use log::*;

pub async fn create(db: &impl ConnectionTrait, task_model: Model, user_id: Id) -> Result<Model, Error> {
    debug!("New Task Model to be inserted: {task_model:?}");

    let now = chrono::Utc::now();

    let task_active_model: ActiveModel = ActiveModel {
        user_id: Set(user_id),
        text: Set(task_model.text),
        assignee: Set(task_model.assignee),
        due: Set(task_model.due),
        priority: Set(task_model.priority),
        status: Set(task_model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(task_active_model.save(db).await?.try_into_model()?)
}

/// Stores every task for `user_id` in one transaction, preserving order.
pub async fn create_many(
    db: &impl TransactionTrait,
    task_models: Vec<Model>,
    user_id: Id,
) -> Result<Vec<Model>, Error> {
    let txn = db.begin().await?;

    let mut created = Vec::with_capacity(task_models.len());
    for task_model in task_models {
        created.push(create(&txn, task_model, user_id).await?);
    }

    txn.commit().await?;

    info!("Stored {} task(s) for user {user_id}", created.len());
    Ok(created)
}

/// All tasks owned by `user_id`, oldest first.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// The task `id` if it belongs to `user_id`; `RecordNotFound` otherwise.
pub async fn find_by_id_and_user(
    db: &impl ConnectionTrait,
    id: Id,
    user_id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    user_id: Id,
    status: Status,
) -> Result<Model, Error> {
    let task = find_by_id_and_user(db, id, user_id).await.inspect_err(|_| {
        error!("Task with id {id} not found for user {user_id}");
    })?;
    debug!("Existing Task model to be Updated: {task:?}");

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(task.id),
        user_id: Unchanged(task.user_id),
        text: Unchanged(task.text),
        assignee: Unchanged(task.assignee),
        due: Unchanged(task.due),
        priority: Unchanged(task.priority),
        status: Set(status),
        created_at: Unchanged(task.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Deletes the task `id` if `user_id` owns it. Deleting a missing task is not an error.
pub async fn delete_by_id_and_user(
    db: &impl ConnectionTrait,
    id: Id,
    user_id: Id,
) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    debug!("Deleted {} task row(s) with id {id}", result.rows_affected);
    Ok(result.rows_affected)
}
