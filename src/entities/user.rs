//! User entity - Represents an account in the laboratory system.
//!
//! Users carry a role (`"admin"`, `"teacher"`, or `"student"`) and are
//! referenced by reagents, requests, tasks, submissions, and announcements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Login name, stored trimmed and lowercased; unique across the table
    #[sea_orm(unique)]
    pub username: String,
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Contact address; unique across the table
    #[sea_orm(unique)]
    pub email: String,
    /// Client-computed password hash, compared verbatim at login
    pub password_hash: String,
    /// Role of the account: `"admin"`, `"teacher"`, or `"student"`
    pub role: String,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Reagents this user registered
    #[sea_orm(has_many = "super::reagent::Entity")]
    Reagents,
    /// Reagent requests placed by this user
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
    /// Tasks this user created
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    /// Submissions handed in by this user
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
    /// Announcements posted by this user
    #[sea_orm(has_many = "super::announcement::Entity")]
    Announcements,
}

impl Related<super::reagent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reagents.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Announcements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
