use rekvi_basket::BasketService;
use rekvi_catalog::CatalogGateway;
use rekvi_core::session::SessionStore;
use rekvi_core::user::UserGateway;
use rekvi_favorites::FavoritesService;
use rekvi_order::history::OrderHistoryGateway;
use rekvi_order::{OrderGateway, PhonePolicy, ZipLookupGateway};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub basket: Arc<BasketService>,
    pub catalog: Arc<dyn CatalogGateway>,
    pub orders: Arc<dyn OrderGateway>,
    pub order_history: Arc<dyn OrderHistoryGateway>,
    pub zip_lookup: Arc<dyn ZipLookupGateway>,
    pub favorites: Arc<FavoritesService>,
    pub users: Arc<dyn UserGateway>,
    pub session: Arc<dyn SessionStore>,
    pub phone_policy: PhonePolicy,
}
