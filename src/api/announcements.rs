//! Announcement resource handlers.

use crate::api::extract::ValidJson;
use crate::api::users::UserResponse;
use crate::api::AppState;
use crate::core::announcement::{self, AnnouncementChanges, NewAnnouncement};
use crate::entities::announcement::Model as AnnouncementModel;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Announcement representation returned to clients, with its author nested.
#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    /// Unique identifier
    pub id: i32,
    /// Author id
    pub user_id: i32,
    /// When the announcement was posted
    pub posted_at: DateTime<Utc>,
    /// Headline
    pub title: String,
    /// Announcement text
    pub body: String,
    /// Nested author representation
    pub user: Option<UserResponse>,
}

impl AnnouncementResponse {
    fn from_parts(model: AnnouncementModel, user: Option<UserResponse>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            posted_at: model.posted_at,
            title: model.title,
            body: model.body,
            user,
        }
    }
}

/// Routes mounted under `/avisos`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<AnnouncementResponse>>> {
    let posted = announcement::list_announcements(&state.db).await?;
    Ok(Json(
        posted
            .into_iter()
            .map(|(model, author)| {
                AnnouncementResponse::from_parts(model, author.map(UserResponse::from))
            })
            .collect(),
    ))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewAnnouncement>,
) -> Result<(StatusCode, Json<AnnouncementResponse>)> {
    let created = announcement::create_announcement(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(hydrate(&state, created).await?)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AnnouncementResponse>> {
    let found = announcement::get_announcement(&state.db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "announcement",
        })?;
    Ok(Json(hydrate(&state, found).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<AnnouncementChanges>,
) -> Result<Json<AnnouncementResponse>> {
    let updated = announcement::update_announcement(&state.db, id, payload).await?;
    Ok(Json(hydrate(&state, updated).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    announcement::delete_announcement(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "announcement deleted" }),
    ))
}

async fn hydrate(state: &AppState, model: AnnouncementModel) -> Result<AnnouncementResponse> {
    let author = crate::core::user::get_user(&state.db, model.user_id)
        .await?
        .map(UserResponse::from);
    Ok(AnnouncementResponse::from_parts(model, author))
}
