//! Shared building blocks for the alias connection tools.
//!
//! Holds the error type, the data models passed between the resolver and the
//! connection manager, and the default file locations.

pub mod config;
pub mod errors;
pub mod models;

pub use config::AliasPaths;
pub use errors::{AppError, AppResult};
