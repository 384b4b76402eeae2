//! Bot module - Telegram transport and outbound calls.

pub mod api;
pub mod dispatcher;
mod runtime;
mod webhook;

pub use dispatcher::{AppState, build_dispatcher};
pub use runtime::run;
