use crate::error::ApiError;
use crate::session::require_user;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rekvi_basket::BasketLine;
use rekvi_catalog::Material;
use rekvi_shared::{MaterialId, UserNo};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/basket", get(get_basket))
        .route("/v1/basket/notice", get(login_notice))
        .route("/v1/basket/items", post(add_item))
        .route("/v1/basket/items/{id}/decrease", post(decrease_item))
        .route("/v1/basket/items/{id}/remove", post(remove_item))
}

#[derive(Debug, Serialize)]
struct BasketSummary {
    lines: Vec<BasketLine>,
    total_quantity: i64,
}

async fn summary(state: &AppState, user: &UserNo) -> BasketSummary {
    let lines = state.basket.snapshot(user).await;
    BasketSummary {
        total_quantity: lines.iter().map(|l| l.quantity).sum(),
        lines: lines.as_ref().clone(),
    }
}

async fn get_basket(State(state): State<AppState>) -> Result<Json<BasketSummary>, ApiError> {
    let user = require_user(&state).await?;
    state.basket.refresh_snapshot(&user).await?;
    Ok(Json(summary(&state, &user).await))
}

#[derive(Debug, Serialize)]
struct LoginNotice {
    line_count: usize,
    message: Option<String>,
}

/// Shown right after user selection: whether a basket was left behind from
/// an earlier session. Silent when the basket is empty.
async fn login_notice(State(state): State<AppState>) -> Result<Json<LoginNotice>, ApiError> {
    let user = require_user(&state).await?;
    state.basket.refresh_snapshot(&user).await?;
    let line_count = state.basket.snapshot(&user).await.len();
    let message = (line_count > 0).then(|| {
        format!(
            "There are already {} item(s) in the basket from an earlier session.",
            line_count
        )
    });
    Ok(Json(LoginNotice {
        line_count,
        message,
    }))
}

async fn material(state: &AppState, user: &UserNo, id: MaterialId) -> Result<Material, ApiError> {
    state
        .catalog
        .get(user, id)
        .await
        .map_err(|e| ApiError::remote(e, "The material could not be loaded"))?
        .ok_or_else(|| ApiError::NotFound(format!("No material with id {}", id)))
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    material_id: MaterialId,
}

async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<BasketSummary>, ApiError> {
    let user = require_user(&state).await?;
    let material = material(&state, &user, req.material_id).await?;
    state
        .basket
        .add_line(&user, material.id, material.unit_multiple)
        .await?;
    Ok(Json(summary(&state, &user).await))
}

async fn decrease_item(
    State(state): State<AppState>,
    Path(id): Path<MaterialId>,
) -> Result<Json<BasketSummary>, ApiError> {
    let user = require_user(&state).await?;
    let material = material(&state, &user, id).await?;
    state
        .basket
        .decrease_line(&user, material.id, material.unit_multiple)
        .await?;
    Ok(Json(summary(&state, &user).await))
}

#[derive(Debug, Deserialize)]
struct RemoveItemRequest {
    /// Raw quantity text as displayed; the service validates it.
    current_quantity: String,
}

async fn remove_item(
    State(state): State<AppState>,
    Path(id): Path<MaterialId>,
    Json(req): Json<RemoveItemRequest>,
) -> Result<Json<BasketSummary>, ApiError> {
    let user = require_user(&state).await?;
    state
        .basket
        .remove_line(&user, id, &req.current_quantity)
        .await?;
    Ok(Json(summary(&state, &user).await))
}
