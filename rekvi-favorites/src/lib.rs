pub mod editor;
pub mod models;

pub use editor::{removal_candidates, FavoritesError, FavoritesService};
pub use models::{FavoriteEntry, FavoritesGateway, ListChoice};
