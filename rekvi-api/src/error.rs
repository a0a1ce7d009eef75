use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rekvi_basket::BasketError;
use rekvi_core::remote::RemoteError;
use rekvi_core::CoreError;
use rekvi_favorites::FavoritesError;
use rekvi_order::workflow::WorkflowError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    NoSession,
    /// Remote call failed; carries the user-facing message already extracted
    /// from the error document.
    Remote(String),
    Anyhow(anyhow::Error),
}

impl ApiError {
    pub fn remote(err: RemoteError, fallback: &str) -> Self {
        Self::Remote(err.user_message(fallback))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NoSession => (
                StatusCode::UNAUTHORIZED,
                "No user is selected".to_string(),
            ),
            ApiError::Remote(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        Self::remote(err, "The request could not be completed")
    }
}

impl From<BasketError> for ApiError {
    fn from(err: BasketError) -> Self {
        match err {
            BasketError::Remote(remote) => {
                Self::remote(remote, "The basket could not be updated")
            }
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Remote(remote) => {
                Self::remote(remote, "The order could not be created")
            }
            WorkflowError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<FavoritesError> for ApiError {
    fn from(err: FavoritesError) -> Self {
        match err {
            FavoritesError::Remote(remote) => {
                Self::remote(remote, "The favorite list could not be updated")
            }
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => Self::Validation(msg),
            other => Self::Anyhow(anyhow::anyhow!(other)),
        }
    }
}
