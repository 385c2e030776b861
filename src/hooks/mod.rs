//! Sanitize hooks supplied with the crate
//!
//! Register them with [`register_sanitize_hook`] for the process-wide
//! registry, or with a [`HookRegistry`] handed to a single logger.

pub mod dsn;
pub mod key;

pub use dsn::DsnHook;
pub use key::{FnHook, KeyHook};

pub use crate::core::hooks::register_sanitize_hook;
pub use crate::core::{HookRegistry, SanitizeHook};
