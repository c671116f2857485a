//! User business logic - account management and the login check.
//!
//! Usernames are normalized (trimmed, lowercased) on the way in, which also
//! makes the login lookup case-insensitive. Deleting a user detaches the
//! tasks they created instead of removing them.

use crate::entities::{Task, User, task, user};
use crate::errors::{Error, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Roles an account may hold.
pub const ROLES: [&str; 3] = ["admin", "teacher", "student"];

/// Payload for creating a user.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    /// Login name; trimmed and lowercased before storage
    pub username: String,
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Contact address
    pub email: String,
    /// Client-computed password hash, stored verbatim
    pub password_hash: String,
    /// One of [`ROLES`]
    pub role: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Login name; matched case-insensitively
    pub username: String,
    /// Client-computed hash compared against the stored one
    pub password_hash: String,
}

/// Retrieves all users ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by id, returning None if absent.
pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Creates a new user after normalizing its identifying fields and
/// validating the role.
pub async fn create_user(db: &DatabaseConnection, new: NewUser) -> Result<user::Model> {
    let username = new.username.trim().to_lowercase();
    if username.is_empty() {
        return Err(Error::Validation {
            message: "username must not be empty".to_string(),
        });
    }

    let email = new.email.trim().to_string();
    if email.is_empty() {
        return Err(Error::Validation {
            message: "email must not be empty".to_string(),
        });
    }

    if !ROLES.contains(&new.role.as_str()) {
        return Err(Error::Validation {
            message: "role must be one of: admin, teacher, student".to_string(),
        });
    }

    let model = user::ActiveModel {
        username: Set(username),
        name: Set(new.name.trim().to_string()),
        surname: Set(new.surname.trim().to_string()),
        email: Set(email),
        password_hash: Set(new.password_hash),
        role: Set(new.role),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Deletes a user, first detaching any tasks they created so those tasks
/// survive with an empty creator reference.
pub async fn delete_user(db: &DatabaseConnection, user_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let existing = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    Task::update_many()
        .col_expr(task::Column::CreatedBy, Expr::value(Option::<i32>::None))
        .filter(task::Column::CreatedBy.eq(user_id))
        .exec(&txn)
        .await?;

    existing.delete(&txn).await?;
    txn.commit().await?;

    Ok(())
}

/// Checks submitted credentials against the stored record.
///
/// The username is matched case-insensitively; the stored hash must equal
/// the submitted hash exactly. Both failure modes collapse into
/// [`Error::Unauthorized`] so the response does not reveal which part was
/// wrong.
pub async fn login(db: &DatabaseConnection, credentials: &Credentials) -> Result<user::Model> {
    let username = credentials.username.trim().to_lowercase();

    let account = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)?;

    if account.password_hash != credentials.password_hash {
        return Err(Error::Unauthorized);
    }

    Ok(account)
}
