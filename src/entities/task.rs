//! Task entity - An assignment with a due date/time and optional attachment.
//!
//! Deleting a task removes its submissions and its stored file. The creator
//! reference is detached (set to NULL) when the creating user is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    /// Unique identifier for the task
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Title shown to students
    pub title: String,
    /// Longer description of the assignment
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Calendar date the task is due
    pub due_date: Option<Date>,
    /// Time of day submissions close
    pub due_time: Option<Time>,
    /// Creating user; NULL once that user is deleted
    pub created_by: Option<i32>,
    /// Stored path of the task's attachment, when one was uploaded
    pub file_path: Option<String>,
    /// When the task was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Task and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user who created the task
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    CreatedBy,
    /// Submissions handed in for this task; removed together with the task
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
