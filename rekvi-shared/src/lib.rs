pub mod ids;
pub mod pii;

pub use ids::{MaterialId, UserNo};

/// Name of the synthetic favorite list every material belongs to. The
/// backend never stores it; it only exists as a "no filter" choice and is
/// excluded from every create/remove candidate set.
pub const ALL_ITEMS_LIST: &str = "Alle varer";
