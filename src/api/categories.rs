//! Category resource handlers.

use crate::api::AppState;
use crate::api::extract::ValidJson;
use crate::core::category::{self, NewCategory};
use crate::entities::category::Model as CategoryModel;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Category representation returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    /// Unique identifier
    pub id: i32,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

impl From<CategoryModel> for CategoryResponse {
    fn from(model: CategoryModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

/// Routes mounted under `/categorias`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = category::list_categories(&state.db).await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewCategory>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    let created = category::create_category(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(created))))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>> {
    let found = category::get_category(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "category" })?;
    Ok(Json(CategoryResponse::from(found)))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    category::delete_category(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "category deleted" })))
}
