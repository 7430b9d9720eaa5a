//! Pixstore Core Library
//!
//! This crate provides the upload validation core shared across all Pixstore
//! components: the file signature catalog, size and signature validation,
//! bounded stream ingestion, configuration, and error types.

pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod signature;
pub mod validator;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ingest::read_capped;
pub use models::{ImageRecord, StoredAsset};
pub use signature::{signature_catalog, SignatureCatalog};
pub use validator::{file_extension, FileValidator, ProcessedFile, ValidationError, MEGABYTE};
