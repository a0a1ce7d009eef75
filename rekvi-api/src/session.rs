use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rekvi_core::session::SessionContext;
use rekvi_shared::UserNo;
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/session",
        get(current_session)
            .put(select_user)
            .delete(clear_session),
    )
}

/// The user every other route operates on behalf of.
pub async fn require_user(state: &AppState) -> Result<UserNo, ApiError> {
    let ctx = state.session.load().await?;
    ctx.map(|c| c.user_no).ok_or(ApiError::NoSession)
}

async fn current_session(
    State(state): State<AppState>,
) -> Result<Json<SessionContext>, ApiError> {
    let ctx = state.session.load().await?;
    ctx.map(Json).ok_or(ApiError::NoSession)
}

#[derive(Debug, Deserialize)]
struct SelectUserRequest {
    user_no: UserNo,
}

async fn select_user(
    State(state): State<AppState>,
    Json(req): Json<SelectUserRequest>,
) -> Result<Json<SessionContext>, ApiError> {
    let ctx = SessionContext::new(req.user_no);
    state.session.save(&ctx).await?;
    tracing::info!(user = %ctx.user_no, "user selected");
    Ok(Json(ctx))
}

async fn clear_session(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.session.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
