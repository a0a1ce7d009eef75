use crate::error::ApiError;
use crate::session::require_user;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use rekvi_core::user::{ContactUpdate, UserProfile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/profile", get(get_profile))
        .route("/v1/profile/contact", put(update_contact))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, ApiError> {
    let user = require_user(&state).await?;
    let profile = state
        .users
        .fetch(&user)
        .await
        .map_err(|e| ApiError::remote(e, "The user profile could not be loaded"))?;
    Ok(Json(profile))
}

async fn update_contact(
    State(state): State<AppState>,
    Json(update): Json<ContactUpdate>,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state).await?;
    state
        .users
        .update_contact(&user, &update)
        .await
        .map_err(|e| ApiError::remote(e, "The contact details could not be saved"))?;
    tracing::info!(user = %user, "contact details updated");
    Ok(StatusCode::NO_CONTENT)
}
