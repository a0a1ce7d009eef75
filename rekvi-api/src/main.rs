use rekvi_api::{app, AppState};
use rekvi_basket::BasketService;
use rekvi_core::session::{SessionContext, SessionStore};
use rekvi_favorites::FavoritesService;
use rekvi_shared::UserNo;
use rekvi_store::{FileSessionStore, MemorySessionStore, MemoryStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rekvi_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = rekvi_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Rekvi API on port {}", config.server.port);

    let store = Arc::new(MemoryStore::seeded());

    let session: Arc<dyn SessionStore> = match &config.session.file_path {
        Some(path) => Arc::new(FileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::default()),
    };
    // Development convenience: select the seeded user when nothing is saved.
    if session
        .load()
        .await
        .expect("Failed to read session")
        .is_none()
    {
        let ctx = SessionContext::new(UserNo::from("0000123"));
        session.save(&ctx).await.expect("Failed to save session");
        tracing::info!(user = %ctx.user_no, "no saved session, seeded user selected");
    }

    let app_state = AppState {
        basket: Arc::new(BasketService::new(store.clone())),
        catalog: store.clone(),
        orders: store.clone(),
        order_history: store.clone(),
        zip_lookup: store.clone(),
        favorites: Arc::new(FavoritesService::new(store.clone())),
        users: store.clone(),
        session,
        phone_policy: config.order.phone_policy,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server port");
    axum::serve(listener, app).await.expect("Server failed");
}
