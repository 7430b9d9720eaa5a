//! Pixstore API Library
//!
//! This crate provides the HTTP API handlers and application setup.

// Module declarations
mod handlers;
mod services;

// Public modules
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::fetch::RemoteFetcher;
pub use services::images::{ImageService, UploadSource};
