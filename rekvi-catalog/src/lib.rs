pub mod material;
pub mod search;

pub use material::{CatalogGateway, Material};
pub use search::CatalogQuery;
