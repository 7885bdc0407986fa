pub mod agent;
pub mod config;
pub mod entry;
pub mod error;
pub mod generation;
pub mod message;
pub mod profile;

// Re-export common error type
pub use error::{HaruError, Result};
