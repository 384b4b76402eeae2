//! Repositories over the key-value store.

mod settings_repository;
mod warns_repository;

pub use settings_repository::SettingsRepository;
pub use warns_repository::WarnsRepository;
