// Public modules
pub mod bump;
pub mod config;
pub mod error;
pub mod modpath;
pub mod module;
pub mod toolchain;
pub mod transform;
pub mod walk;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
