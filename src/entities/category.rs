//! Category entity - Groups reagents for organization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name of the category
    pub name: String,
    /// Free-form description; empty string when none was given
    pub description: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many reagents
    #[sea_orm(has_many = "super::reagent::Entity")]
    Reagents,
}

impl Related<super::reagent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reagents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
