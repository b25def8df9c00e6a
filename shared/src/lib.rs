//! Shared types for the offer engine
//!
//! Catalog and saved-offer models plus the unified error types used by
//! the engine and its storage layer.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
