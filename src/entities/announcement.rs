//! Announcement entity - A timestamped message authored by a user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Announcement database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    /// Unique identifier for the announcement
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Author of the announcement
    pub user_id: i32,
    /// When the announcement was posted
    pub posted_at: DateTimeUtc,
    /// Headline; `"Untitled"` when the author gave none
    pub title: String,
    /// Announcement text
    #[sea_orm(column_type = "Text")]
    pub body: String,
}

/// Defines relationships between Announcement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each announcement belongs to its author
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
