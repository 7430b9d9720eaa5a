//! File validation module
//!
//! Validates uploaded payloads against size limits, the permitted-extension
//! list, and the magic-byte signature catalog. Client-supplied metadata
//! (filename, declared content type) is never trusted on its own; the leading
//! bytes of the content decide what the file is.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;

use crate::signature::signature_catalog;

/// Number of bytes in one megabyte, as used for size-limit reporting.
pub const MEGABYTE: usize = 1_048_576;

/// Errors produced while validating an uploaded file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The file is empty.")]
    Empty,

    #[error("The file exceeds {limit_mb:.1} MB.")]
    TooLarge { limit_mb: f64 },

    #[error("The file type isn't permitted.")]
    UnsupportedType,

    #[error("The file's signature doesn't match the file's extension.")]
    SignatureMismatch,

    #[error("The declared content type '{declared}' doesn't match the detected type '{detected}'.")]
    ContentTypeMismatch { declared: String, detected: String },
}

impl ValidationError {
    /// The reported limit keeps the whole-megabyte figure even when the
    /// configured byte ceiling is not an exact multiple.
    pub(crate) fn too_large(limit_bytes: usize) -> Self {
        Self::TooLarge {
            limit_mb: (limit_bytes / MEGABYTE) as f64,
        }
    }
}

/// A payload that passed validation, paired with the extension derived
/// from its content.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    content: Bytes,
    extension: String,
}

impl ProcessedFile {
    /// The validated content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// The derived extension, lowercase with a leading dot (e.g. `.png`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Validates uploads against a size ceiling and a permitted-extension list.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: usize,
    permitted_extensions: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: usize, permitted_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            permitted_extensions,
        }
    }

    /// Check a payload length against the empty and too-large bounds.
    ///
    /// A payload of exactly the configured ceiling is accepted.
    pub fn validate_size(&self, len: usize) -> Result<(), ValidationError> {
        if len == 0 {
            return Err(ValidationError::Empty);
        }
        if len > self.max_file_size {
            return Err(ValidationError::too_large(self.max_file_size));
        }
        Ok(())
    }

    /// Validate a payload that arrived with a client-supplied filename.
    ///
    /// The extension is parsed from the filename, checked against the
    /// permitted list, and then the content's leading bytes must match one
    /// of the signatures registered for that extension. The filename is
    /// otherwise discarded.
    pub fn validate_named(
        &self,
        content: Bytes,
        filename: &str,
    ) -> Result<ProcessedFile, ValidationError> {
        self.validate_size(content.len())?;

        let extension = file_extension(filename).ok_or(ValidationError::UnsupportedType)?;
        if !self.is_permitted(&extension) {
            return Err(ValidationError::UnsupportedType);
        }

        // An extension with no registered signatures can never be verified
        // against content, so it fails the signature check.
        let signatures = signature_catalog()
            .signatures_for(&extension)
            .ok_or(ValidationError::SignatureMismatch)?;
        if !signatures.iter().any(|sig| content.starts_with(sig)) {
            return Err(ValidationError::SignatureMismatch);
        }

        Ok(ProcessedFile { content, extension })
    }

    /// Validate a payload with no trustworthy filename.
    ///
    /// The extension is derived purely from the content's leading bytes.
    /// When a declared content type is supplied (raw-stream uploads), it
    /// must agree with the canonical type of the derived extension.
    pub fn validate_by_signature(
        &self,
        content: Bytes,
        declared_content_type: Option<&str>,
    ) -> Result<ProcessedFile, ValidationError> {
        self.validate_size(content.len())?;

        let extension = signature_catalog()
            .extension_by_signature(&content)
            .ok_or(ValidationError::UnsupportedType)?;
        if !self.is_permitted(extension) {
            return Err(ValidationError::UnsupportedType);
        }

        if let Some(declared) = declared_content_type {
            let canonical = signature_catalog()
                .content_type_for(extension)
                .unwrap_or_default();
            if normalize_mime(declared) != canonical {
                return Err(ValidationError::ContentTypeMismatch {
                    declared: declared.to_string(),
                    detected: canonical.to_string(),
                });
            }
        }

        Ok(ProcessedFile {
            content,
            extension: extension.to_string(),
        })
    }

    fn is_permitted(&self, extension: &str) -> bool {
        self.permitted_extensions.iter().any(|e| e == extension)
    }
}

/// Extension of the final path component, lowercase with its leading dot.
///
/// Returns `None` for names without a dot or ending in one.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = Path::new(filename).file_name()?.to_str()?;
    let idx = name.rfind('.')?;
    let ext = &name[idx..];
    if ext.len() < 2 {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Strip MIME parameters and lowercase, e.g. `IMAGE/PNG; q=1` -> `image/png`.
fn normalize_mime(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_lowercase()
}
