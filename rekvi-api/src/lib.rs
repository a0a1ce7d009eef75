use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod basket;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod orders;
pub mod profile;
pub mod session;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(session::routes())
        .merge(catalog::routes())
        .merge(basket::routes())
        .merge(orders::routes())
        .merge(favorites::routes())
        .merge(profile::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
