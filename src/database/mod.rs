//! Persistence layer: key-value backends, models and repositories.

mod memory;
mod models;
mod mongo;
mod repository;
mod store;

pub use memory::MemoryStore;
pub use models::*;
pub use mongo::{Database, MongoStore};
pub use repository::{SettingsRepository, WarnsRepository};
pub use store::{KvStore, keys};
