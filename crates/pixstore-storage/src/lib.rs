//! Pixstore Storage Library
//!
//! Filesystem-backed asset storage. Every stored image gets its own folder
//! under the configured root, named by a generated token, with the content
//! written as `original<extension>`. The folder is the unit of deletion.

pub mod error;
pub mod local;

pub use error::{StorageError, StorageResult};
pub use local::AssetStorage;
