//! Submission resource handlers.
//!
//! Create and update accept multipart form-data with an optional `file`
//! part, with the same two-phase attachment replacement as tasks.

use crate::api::extract::{MultipartForm, parse_float_field, parse_int_field};
use crate::api::tasks::{TaskResponse, discard_upload, save_upload};
use crate::api::users::UserResponse;
use crate::api::AppState;
use crate::core::submission::{self, SubmissionChanges, SubmissionDraft};
use crate::entities::submission::Model as SubmissionModel;
use crate::errors::{Error, Result};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::HashMap;

/// Submission representation returned to clients, with the student and the
/// answered task nested.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// Unique identifier
    pub id: i32,
    /// Task being answered
    pub task_id: i32,
    /// Student who handed the submission in
    pub student_id: i32,
    /// Stored attachment path
    pub file_path: Option<String>,
    /// When the submission was handed in
    pub submitted_at: DateTime<Utc>,
    /// Assigned grade, once graded
    pub grade: Option<f64>,
    /// Reviewer remarks
    pub remarks: Option<String>,
    /// Nested student representation
    pub student: Option<UserResponse>,
    /// Nested task representation
    pub task: Option<TaskResponse>,
}

impl SubmissionResponse {
    fn from_parts(
        model: SubmissionModel,
        student: Option<UserResponse>,
        task: Option<TaskResponse>,
    ) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            student_id: model.student_id,
            file_path: model.file_path,
            submitted_at: model.submitted_at,
            grade: model.grade,
            remarks: model.remarks,
            student,
            task,
        }
    }
}

/// Routes mounted under `/entregas`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
}

/// Builds nested responses for a batch of submissions, resolving students
/// and tasks through two lookups instead of one query per row.
pub(crate) async fn to_responses(
    db: &DatabaseConnection,
    handed_in: Vec<SubmissionModel>,
) -> Result<Vec<SubmissionResponse>> {
    let users: HashMap<i32, _> = crate::core::user::list_users(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let tasks: HashMap<i32, _> = crate::core::task::list_tasks(db)
        .await?
        .into_iter()
        .map(|(t, creator)| (t.id, (t, creator)))
        .collect();

    Ok(handed_in
        .into_iter()
        .map(|model| {
            let student = users.get(&model.student_id).cloned().map(UserResponse::from);
            let task = tasks.get(&model.task_id).cloned().map(|(task, creator)| {
                TaskResponse::from_parts(task, creator, None)
            });
            SubmissionResponse::from_parts(model, student, task)
        })
        .collect())
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<SubmissionResponse>>> {
    let handed_in = submission::list_submissions(&state.db).await?;
    Ok(Json(to_responses(&state.db, handed_in).await?))
}

async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>)> {
    let form = MultipartForm::read(&mut multipart).await?;

    let draft = SubmissionDraft {
        task_id: parse_int_field("task_id", form.require("task_id")?)?,
        student_id: parse_int_field("student_id", form.require("student_id")?)?,
        grade: form
            .optional("grade")
            .map(|value| parse_float_field("grade", value))
            .transpose()?,
        remarks: form.optional("remarks").map(ToString::to_string),
    };

    let file_path = save_upload(&state, &form).await?;

    let created = match submission::create_submission(&state.db, draft, file_path.clone()).await {
        Ok(created) => created,
        Err(error) => {
            discard_upload(&state, file_path).await;
            return Err(error);
        }
    };
    tracing::info!(
        submission_id = created.id,
        task_id = created.task_id,
        "submission handed in"
    );

    let response = hydrate(&state, created).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>> {
    let found = submission::get_submission(&state.db, id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;
    Ok(Json(hydrate(&state, found).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionResponse>> {
    let form = MultipartForm::read(&mut multipart).await?;

    let changes = SubmissionChanges {
        grade: form
            .optional("grade")
            .map(|value| parse_float_field("grade", value))
            .transpose()?,
        remarks: form.optional("remarks").map(ToString::to_string),
    };

    let new_file_path = save_upload(&state, &form).await?;

    match submission::update_submission(&state.db, id, changes, new_file_path.clone()).await {
        Ok((updated, replaced)) => {
            discard_upload(&state, replaced).await;
            Ok(Json(hydrate(&state, updated).await?))
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
    submission::delete_submission(&state.db, &state.store, id).await?;
    Ok(Json(serde_json::json!({ "message": "submission deleted" })))
}

/// Loads the nested student and task for a single submission.
async fn hydrate(state: &AppState, model: SubmissionModel) -> Result<SubmissionResponse> {
    let student = crate::core::user::get_user(&state.db, model.student_id)
        .await?
        .map(UserResponse::from);
    let task = crate::core::task::get_task_with_creator(&state.db, model.task_id)
        .await?
        .map(|(task, creator)| TaskResponse::from_parts(task, creator, None));

    Ok(SubmissionResponse::from_parts(model, student, task))
}
