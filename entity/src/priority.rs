use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Urgency of a task, stored as its capitalized name.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Priority {
    #[sea_orm(string_value = "High")]
    High,
    #[sea_orm(string_value = "Medium")]
    #[default]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(fmt, "High"),
            Priority::Medium => write!(fmt, "Medium"),
            Priority::Low => write!(fmt, "Low"),
        }
    }
}
