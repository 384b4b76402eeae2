//! Permission system for deciding who counts as an admin.
//!
//! A user is an admin of a chat when they are listed in that chat's
//! settings or in the process-wide `ADMIN_IDS`. The union is recomputed on
//! every check because chat-local admins change at runtime.
//!
//! ```rust
//! let admins = AdminResolver::new(config.admin_ids.clone());
//! if admins.is_admin(user_id, &settings) {
//!     // ...
//! }
//! ```

mod checker;

pub use checker::AdminResolver;
