//! Application services.

pub mod fetch;
pub mod images;
