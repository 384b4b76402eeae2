//! Database models.

pub mod chat_settings;

pub use chat_settings::{ChatSettings, Feature, flag_name};
