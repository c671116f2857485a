//! Attachment download endpoint.

use crate::api::AppState;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;

/// `GET /download/{resource_type}/{id}` - streams back the attachment of a
/// task (`tarea`) or submission (`entrega`), named after its stored
/// basename. Missing records, unset paths, and files gone from disk all
/// surface as 404.
pub async fn download(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, i32)>,
) -> Result<impl IntoResponse> {
    let file_path = match resource_type.as_str() {
        "tarea" => {
            crate::core::task::get_task(&state.db, id)
                .await?
                .ok_or(Error::NotFound { entity: "task" })?
                .file_path
        }
        "entrega" => {
            crate::core::submission::get_submission(&state.db, id)
                .await?
                .ok_or(Error::NotFound {
                    entity: "submission",
                })?
                .file_path
        }
        _ => {
            return Err(Error::Validation {
                message: "invalid resource type; use \"tarea\" or \"entrega\"".to_string(),
            });
        }
    };

    let path = file_path.ok_or(Error::NotFound { entity: "file" })?;
    let (basename, bytes) = state.store.load(&path).await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{basename}\""),
            ),
        ],
        bytes,
    ))
}
