pub mod app_config;
pub mod memory;
pub mod session;

pub use app_config::Config;
pub use memory::MemoryStore;
pub use session::{FileSessionStore, MemorySessionStore};
