use crate::error::ApiError;
use crate::session::require_user;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rekvi_basket::{BulkCopyResult, CopyLine};
use rekvi_order::history::OrderRecord;
use rekvi_order::workflow::{ConfirmationWorkflow, FrozenDraft};
use rekvi_order::{AddressChoice, AlternativeAddress, ContactInfo, OrderDraft};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(order_history))
        .route("/v1/orders/{order_number}/copy", post(copy_order))
        .route("/v1/orders/confirm", post(confirm_order))
        .route("/v1/orders/submit", post(submit_order))
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    /// Shipped orders are hidden unless asked for.
    #[serde(default)]
    include_closed: bool,
}

async fn order_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<OrderRecord>>, ApiError> {
    let user = require_user(&state).await?;
    let orders = state
        .order_history
        .query(&user)
        .await
        .map_err(|e| ApiError::remote(e, "The order history could not be loaded"))?;
    let orders = orders
        .into_iter()
        .filter(|o| params.include_closed || !o.is_closed())
        .collect();
    Ok(Json(orders))
}

#[derive(Debug, Serialize)]
struct CopyOrderResponse {
    succeeded: usize,
    failed_items: Vec<String>,
    success_message: Option<String>,
    failure_message: Option<String>,
}

impl From<BulkCopyResult> for CopyOrderResponse {
    fn from(result: BulkCopyResult) -> Self {
        Self {
            success_message: result.success_message(),
            failure_message: result.failure_message(),
            succeeded: result.succeeded,
            failed_items: result.failed_items,
        }
    }
}

async fn copy_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<CopyOrderResponse>, ApiError> {
    let user = require_user(&state).await?;
    let orders = state
        .order_history
        .query(&user)
        .await
        .map_err(|e| ApiError::remote(e, "The order history could not be loaded"))?;
    let order = orders
        .into_iter()
        .find(|o| o.order_number == order_number)
        .ok_or_else(|| ApiError::NotFound(format!("No order {}", order_number)))?;

    let lines: Vec<CopyLine> = order
        .items
        .iter()
        .map(|item| CopyLine {
            material_id: item.material_id,
            quantity: item.quantity,
            display_name: item.display_name.clone(),
        })
        .collect();
    let result = state.basket.copy_lines(&user, &lines).await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct ConfirmOrderRequest {
    address_choice: AddressChoice,
    #[serde(default)]
    alternative_address: AlternativeAddress,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
}

#[derive(Debug, Serialize)]
struct ConfirmOrderResponse {
    draft: FrozenDraft,
}

/// Runs the two confirmation dialogs in one request: address capture with
/// the full validation sequence, then the final confirmation. The returned
/// frozen draft is what `/v1/orders/submit` takes back.
async fn confirm_order(
    State(state): State<AppState>,
    Json(req): Json<ConfirmOrderRequest>,
) -> Result<Json<ConfirmOrderResponse>, ApiError> {
    let user = require_user(&state).await?;
    let profile = state
        .users
        .fetch(&user)
        .await
        .map_err(|e| ApiError::remote(e, "The user profile could not be loaded"))?;

    state.basket.refresh_snapshot(&user).await?;
    let total_item_count = state.basket.total_quantity(&user).await;

    let draft = OrderDraft {
        user_no: user,
        customer_name: profile.name,
        address_choice: req.address_choice,
        registered_address: Some(profile.registered),
        alternative_address: req.alternative_address,
        contact: ContactInfo {
            email: req.email,
            phone: req.phone,
        },
        total_item_count,
    };

    let mut workflow = ConfirmationWorkflow::begin(draft, state.phone_policy)?;
    workflow.confirm_address(state.zip_lookup.as_ref()).await?;
    workflow.confirm_final()?;
    let draft = workflow.frozen()?;
    Ok(Json(ConfirmOrderResponse { draft }))
}

#[derive(Debug, Serialize)]
struct SubmitOrderResponse {
    order_number: String,
    message: String,
}

async fn submit_order(
    State(state): State<AppState>,
    Json(draft): Json<FrozenDraft>,
) -> Result<Json<SubmitOrderResponse>, ApiError> {
    let user = require_user(&state).await?;
    if draft.user_no != user {
        return Err(ApiError::Validation(
            "The draft belongs to a different user".to_string(),
        ));
    }

    let message = draft.notification_message();
    let mut workflow = ConfirmationWorkflow::resume(draft, state.phone_policy);
    let receipt = workflow
        .submit(state.orders.as_ref(), &state.basket)
        .await?;
    Ok(Json(SubmitOrderResponse {
        order_number: receipt.order_number,
        message,
    }))
}
