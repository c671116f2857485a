//! Task resource handlers.
//!
//! Create and update accept multipart form-data with an optional `file`
//! part. Attachment replacement is two-phase: the new file is written
//! first, the row update commits, and only then is the old file removed, so
//! a failed database write never strands the record without its attachment.

use crate::api::extract::{MultipartForm, parse_int_field};
use crate::api::users::UserResponse;
use crate::api::{AppState, submissions};
use crate::core::task::{self, TaskChanges, TaskDraft};
use crate::entities::task::Model as TaskModel;
use crate::entities::user::Model as UserModel;
use crate::errors::{Error, Result};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Task representation returned to clients. `status` is only populated on
/// listings filtered by a student and is never stored.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Unique identifier
    pub id: i32,
    /// Title shown to students
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Calendar date the task is due
    pub due_date: Option<NaiveDate>,
    /// Time of day submissions close
    pub due_time: Option<NaiveTime>,
    /// Creating user, when still present
    pub created_by: Option<i32>,
    /// Stored attachment path
    pub file_path: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Nested creator representation
    pub creator: Option<UserResponse>,
    /// Derived completion status for the requesting student
    pub status: Option<String>,
}

impl TaskResponse {
    pub(crate) fn from_parts(
        model: TaskModel,
        creator: Option<UserModel>,
        status: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            due_time: model.due_time,
            created_by: model.created_by,
            file_path: model.file_path,
            created_at: model.created_at,
            creator: creator.map(UserResponse::from),
            status,
        }
    }
}

/// Query parameters accepted by the task listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Student whose completion status should annotate each task
    pub user_id: Option<i32>,
}

/// Routes mounted under `/tareas`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
        .route("/:id/entregas", get(submissions_for_task))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TaskResponse>>> {
    let tasks = task::list_tasks(&state.db).await?;

    let completed = match params.user_id {
        Some(student_id) => Some(task::completed_task_ids(&state.db, student_id).await?),
        None => None,
    };

    let responses = tasks
        .into_iter()
        .map(|(model, creator)| {
            let status = completed.as_ref().map(|done| {
                if done.contains(&model.id) {
                    "completed".to_string()
                } else {
                    "pending".to_string()
                }
            });
            TaskResponse::from_parts(model, creator, status)
        })
        .collect();

    Ok(Json(responses))
}

async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let form = MultipartForm::read(&mut multipart).await?;

    let draft = TaskDraft {
        title: form.require("title")?.to_string(),
        description: form.optional("description").map(ToString::to_string),
        due_date: form.optional("due_date").map(parse_due_date).transpose()?,
        due_time: form.optional("due_time").map(parse_due_time).transpose()?,
        created_by: parse_int_field("created_by", form.require("created_by")?)?,
    };

    let file_path = save_upload(&state, &form).await?;

    let created = match task::create_task(&state.db, draft, file_path.clone()).await {
        Ok(created) => created,
        Err(error) => {
            discard_upload(&state, file_path).await;
            return Err(error);
        }
    };
    tracing::info!(task_id = created.id, "task created");

    let response = with_creator(&state, created, None).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<TaskResponse>> {
    let (found, creator) = task::get_task_with_creator(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "task" })?;
    Ok(Json(TaskResponse::from_parts(found, creator, None)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<TaskResponse>> {
    let form = MultipartForm::read(&mut multipart).await?;

    let changes = TaskChanges {
        title: form.require("title")?.to_string(),
        description: form.optional("description").map(ToString::to_string),
        due_date: form.optional("due_date").map(parse_due_date).transpose()?,
        due_time: form.optional("due_time").map(parse_due_time).transpose()?,
    };

    let new_file_path = save_upload(&state, &form).await?;

    match task::update_task(&state.db, id, changes, new_file_path.clone()).await {
        Ok((updated, replaced)) => {
            discard_upload(&state, replaced).await;
            let response = with_creator(&state, updated, None).await?;
            Ok(Json(response))
        }
        Err(error) => {
            discard_upload(&state, new_file_path).await;
            Err(error)
        }
    }
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    task::delete_task(&state.db, &state.store, id).await?;
    tracing::info!(task_id = id, "task deleted");
    Ok(Json(serde_json::json!({ "message": "task deleted" })))
}

/// `GET /tareas/{id}/entregas` - every submission handed in for the task.
async fn submissions_for_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<submissions::SubmissionResponse>>> {
    let handed_in = crate::core::submission::list_for_task(&state.db, id).await?;
    let responses = submissions::to_responses(&state.db, handed_in).await?;
    Ok(Json(responses))
}

/// Stores the form's file part, when present.
pub(crate) async fn save_upload(state: &AppState, form: &MultipartForm) -> Result<Option<String>> {
    match &form.file {
        Some((filename, bytes)) => Ok(Some(state.store.save(filename, bytes).await?)),
        None => Ok(None),
    }
}

/// Best-effort removal of a stored file that lost its owning row.
pub(crate) async fn discard_upload(state: &AppState, path: Option<String>) {
    if let Some(path) = path {
        if let Err(error) = state.store.delete(&path).await {
            tracing::warn!(%error, %path, "failed to remove stale attachment");
        }
    }
}

async fn with_creator(
    state: &AppState,
    model: TaskModel,
    status: Option<String>,
) -> Result<TaskResponse> {
    let creator = match model.created_by {
        Some(id) => crate::core::user::get_user(&state.db, id).await?,
        None => None,
    };
    Ok(TaskResponse::from_parts(model, creator, status))
}

fn parse_due_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Error::Validation {
        message: "invalid date format; use YYYY-MM-DD".to_string(),
    })
}

fn parse_due_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| Error::Validation {
            message: "invalid time format; use HH:MM or HH:MM:SS".to_string(),
        })
}
