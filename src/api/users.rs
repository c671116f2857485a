//! User resource handlers.

use crate::api::extract::ValidJson;
use crate::api::{AppState, submissions};
use crate::core::user::{self, NewUser};
use crate::entities::user::Model as UserModel;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// User representation returned to clients. The password hash never leaves
/// the persistence layer.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// Unique identifier
    pub id: i32,
    /// Login name
    pub username: String,
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Contact address
    pub email: String,
    /// Account role
    pub role: String,
}

impl From<UserModel> for UserResponse {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            surname: model.surname,
            email: model.email,
            role: model.role,
        }
    }
}

/// Routes mounted under `/usuarios`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).delete(remove))
        .route("/:id/entregas", get(submissions_for_user))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = user::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let created = user::create_user(&state.db, payload).await?;
    tracing::info!(user_id = created.id, "user created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>> {
    let found = user::get_user(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;
    Ok(Json(UserResponse::from(found)))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    user::delete_user(&state.db, id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(Json(serde_json::json!({ "message": "user deleted" })))
}

/// `GET /usuarios/{id}/entregas` - every submission handed in by the user.
async fn submissions_for_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<submissions::SubmissionResponse>>> {
    let handed_in = crate::core::submission::list_for_student(&state.db, id).await?;
    let responses = submissions::to_responses(&state.db, handed_in).await?;
    Ok(Json(responses))
}
