//! Reagent entity - A trackable inventory item with a quantity on hand.
//!
//! Quantities are decremented when requests are fulfilled and restored when
//! requests are deleted; the minimum field records the restock threshold.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reagent database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reagents")]
pub struct Model {
    /// Unique identifier for the reagent
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name of the reagent
    pub name: String,
    /// Quantity currently in stock; never negative after request fulfillment
    pub quantity: f64,
    /// Measurement unit, e.g. `"ml"` or `"g"`
    pub unit: String,
    /// Minimum stock threshold for restocking decisions
    pub minimum: f64,
    /// Physical storage location in the laboratory
    pub location: String,
    /// Category this reagent belongs to
    pub category_id: i32,
    /// User who registered the reagent, when known
    pub created_by: Option<i32>,
    /// When the reagent was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Reagent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each reagent belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// The user who registered the reagent
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    CreatedBy,
    /// Requests drawing from this reagent
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
