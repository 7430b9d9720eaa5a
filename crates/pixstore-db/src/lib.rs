//! Pixstore Metadata Store
//!
//! Repositories for image metadata. The repository trait is the seam the
//! rest of the application depends on; the bundled implementation keeps
//! records in process memory.

pub mod images;

pub use images::{ImageRepository, InMemoryImageRepository};
