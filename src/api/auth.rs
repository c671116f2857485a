//! Login endpoint.

use crate::api::AppState;
use crate::api::extract::ValidJson;
use crate::api::users::UserResponse;
use crate::core::user::{self, Credentials};
use crate::errors::Result;
use axum::Json;
use axum::extract::State;

/// `POST /login` - checks the submitted credentials and returns the matching
/// user. Wrong username and wrong password are indistinguishable to the
/// caller.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(credentials): ValidJson<Credentials>,
) -> Result<Json<UserResponse>> {
    let account = user::login(&state.db, &credentials).await?;
    tracing::info!(user_id = account.id, "login succeeded");
    Ok(Json(UserResponse::from(account)))
}
