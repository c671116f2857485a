//! Request resource handlers - the HTTP face of the inventory engine.

use crate::api::extract::ValidJson;
use crate::api::reagents::ReagentResponse;
use crate::api::users::UserResponse;
use crate::api::AppState;
use crate::core::request::{self, NewRequest};
use crate::entities::request::Model as RequestModel;
use crate::errors::{Error, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Request representation returned to clients, with its reagent and user
/// nested.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    /// Unique identifier
    pub id: i32,
    /// Reagent withdrawn from
    pub reagent_id: i32,
    /// Quantity withdrawn
    pub quantity: f64,
    /// Project charged
    pub project: String,
    /// Whether this belongs to a formal project
    pub is_project: bool,
    /// Requesting user
    pub user_id: i32,
    /// When the request was placed
    pub requested_at: DateTime<Utc>,
    /// Nested reagent representation
    pub reagent: Option<ReagentResponse>,
    /// Nested user representation
    pub user: Option<UserResponse>,
}

impl RequestResponse {
    fn from_parts(
        model: RequestModel,
        reagent: Option<ReagentResponse>,
        user: Option<UserResponse>,
    ) -> Self {
        Self {
            id: model.id,
            reagent_id: model.reagent_id,
            quantity: model.quantity,
            project: model.project,
            is_project: model.is_project,
            user_id: model.user_id,
            requested_at: model.requested_at,
            reagent,
            user,
        }
    }
}

/// Routes mounted under `/solicitudes`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).delete(remove))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<RequestResponse>>> {
    let placed = request::list_requests(&state.db).await?;

    let categories: HashMap<i32, _> = crate::core::category::list_categories(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let users: HashMap<i32, _> = crate::core::user::list_users(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let responses = placed
        .into_iter()
        .map(|(model, reagent)| {
            let user = users.get(&model.user_id).cloned().map(UserResponse::from);
            let reagent = reagent.map(|r| {
                let category = categories.get(&r.category_id).cloned();
                ReagentResponse::from_parts(r, category)
            });
            RequestResponse::from_parts(model, reagent, user)
        })
        .collect();

    Ok(Json(responses))
}

async fn create(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewRequest>,
) -> Result<(StatusCode, Json<RequestResponse>)> {
    let placed = request::create_request(&state.db, payload).await?;
    tracing::info!(
        request_id = placed.id,
        reagent_id = placed.reagent_id,
        quantity = placed.quantity,
        "stock withdrawn"
    );

    let response = hydrate(&state, placed).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RequestResponse>> {
    let found = request::get_request(&state.db, id)
        .await?
        .ok_or(Error::NotFound { entity: "request" })?;
    Ok(Json(hydrate(&state, found).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    request::delete_request(&state.db, id).await?;
    tracing::info!(request_id = id, "request deleted, stock restored");
    Ok(Json(serde_json::json!({ "message": "request deleted" })))
}

/// Loads the nested reagent (with category) and user for a single request.
async fn hydrate(state: &AppState, model: RequestModel) -> Result<RequestResponse> {
    let reagent = crate::core::reagent::get_reagent_with_category(&state.db, model.reagent_id)
        .await?
        .map(|(reagent, category)| ReagentResponse::from_parts(reagent, category));
    let user = crate::core::user::get_user(&state.db, model.user_id)
        .await?
        .map(UserResponse::from);

    Ok(RequestResponse::from_parts(model, reagent, user))
}
