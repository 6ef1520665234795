//! SeaORM Entity for the tasks table.
//! One row per extracted action item, owned by the user who submitted the transcript.

use crate::priority::Priority;
use crate::status::Status;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::tasks::Model)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Owner of the task
    #[schema(value_type = String, format = Uuid)]
    pub user_id: Id,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    pub assignee: Option<String>,

    /// Free-form due date as spoken in the meeting, e.g. "Friday"
    pub due: Option<String>,

    pub priority: Priority,

    pub status: Status,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
