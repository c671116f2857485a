//! Reagent resource handlers.

use crate::api::categories::CategoryResponse;
use crate::api::extract::ValidJson;
use crate::api::AppState;
use crate::core::reagent::{self, NewReagent, ReagentChanges};
use crate::entities::category::Model as CategoryModel;
use crate::entities::reagent::Model as ReagentModel;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Reagent representation returned to clients, with its category nested.
#[derive(Debug, Clone, Serialize)]
pub struct ReagentResponse {
    /// Unique identifier
    pub id: i32,
    /// Display name
    pub name: String,
    /// Quantity currently in stock
    pub quantity: f64,
    /// Measurement unit
    pub unit: String,
    /// Minimum stock threshold
    pub minimum: f64,
    /// Storage location
    pub location: String,
    /// Category id
    pub category_id: i32,
    /// Registering user, when known
    pub created_by: Option<i32>,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// Nested category representation
    pub category: Option<CategoryResponse>,
}

impl ReagentResponse {
    pub(crate) fn from_parts(model: ReagentModel, category: Option<CategoryModel>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            quantity: model.quantity,
            unit: model.unit,
            minimum: model.minimum,
            location: model.location,
            category_id: model.category_id,
            created_by: model.created_by,
            created_at: model.created_at,
            category: category.map(CategoryResponse::from),
        }
    }
}

/// Routes mounted under `/reactivos`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<ReagentResponse>>> {
    let reagents = reagent::list_reagents(&state.db).await?;
    Ok(Json(
        reagents
            .into_iter()
            .map(|(model, category)| ReagentResponse::from_parts(model, category))
            .collect(),
    ))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewReagent>,
) -> Result<(StatusCode, Json<ReagentResponse>)> {
    let created = reagent::create_reagent(&state.db, payload).await?;
    tracing::info!(reagent_id = created.id, "reagent registered");

    let category = crate::core::category::get_category(&state.db, created.category_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReagentResponse::from_parts(created, category)),
    ))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReagentResponse>> {
    let (found, category) = reagent::get_reagent_with_category(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "reagent" })?;
    Ok(Json(ReagentResponse::from_parts(found, category)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(payload): ValidJson<ReagentChanges>,
) -> Result<Json<ReagentResponse>> {
    let updated = reagent::update_reagent(&state.db, id, payload).await?;
    let category = crate::core::category::get_category(&state.db, updated.category_id).await?;
    Ok(Json(ReagentResponse::from_parts(updated, category)))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    reagent::delete_reagent(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "reagent deleted" })))
}
