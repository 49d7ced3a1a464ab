//! Utility modules
//!
//! - Error types and file helpers
//! - String helpers shared across the text transforms

pub mod error;
pub mod text;

pub use error::{ForgeError, ForgeResult};
