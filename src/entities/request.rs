//! Request entity - A consumption of reagent stock by a user.
//!
//! Creating a request decrements the reagent's quantity; deleting it restores
//! the quantity. Both happen inside the inventory engine's transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Reagent the request draws from
    pub reagent_id: i32,
    /// Quantity withdrawn from the reagent's stock
    pub quantity: f64,
    /// Project the withdrawal is charged to
    pub project: String,
    /// Whether this withdrawal belongs to a formal project
    pub is_project: bool,
    /// User who placed the request
    pub user_id: i32,
    /// When the request was placed
    pub requested_at: DateTimeUtc,
}

/// Defines relationships between Request and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request belongs to one reagent
    #[sea_orm(
        belongs_to = "super::reagent::Entity",
        from = "Column::ReagentId",
        to = "super::reagent::Column::Id"
    )]
    Reagent,
    /// Each request belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::reagent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reagent.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
