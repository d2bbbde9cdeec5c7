//! condo-config
//!
//! Persistent console preferences: API location, error fallbacks and the
//! policy for validation issues that cannot be routed to a form step.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, UnroutablePolicy};
