//! Submission entity - A student's response to a task, optionally graded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Submission database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    /// Unique identifier for the submission
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Task this submission answers
    pub task_id: i32,
    /// Student who handed the submission in
    pub student_id: i32,
    /// Stored path of the uploaded file, when one was attached
    pub file_path: Option<String>,
    /// When the submission was handed in
    pub submitted_at: DateTimeUtc,
    /// Grade assigned by the reviewer, once graded
    pub grade: Option<f64>,
    /// Reviewer remarks
    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,
}

/// Defines relationships between Submission and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each submission belongs to one task
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id",
        on_delete = "Cascade"
    )]
    Task,
    /// Each submission belongs to the student who handed it in
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
