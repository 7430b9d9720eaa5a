//! HTTP handlers for the image routes.

pub mod image_delete;
pub mod image_get;
pub mod image_update;
pub mod image_upload;
pub mod image_upload_base64;
pub mod image_upload_url;
pub mod responses;
