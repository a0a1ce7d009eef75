pub mod accumulator;
pub mod bulk_copy;
pub mod models;

pub use accumulator::{BasketError, BasketService};
pub use bulk_copy::{BulkCopyResult, CopyLine};
pub use models::{BasketGateway, BasketLine, BasketWrite};
