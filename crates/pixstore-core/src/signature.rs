//! File signature catalog
//!
//! Maps recognized file extensions to the canonical magic-byte prefixes that
//! identify them, and classifies unknown content by those prefixes. The table
//! is process-wide, built once, and never mutated afterwards.
//!
//! For more file signatures, see the file signatures database
//! (https://www.filesignatures.net/) and the official specifications for the
//! file types you wish to add.

use std::sync::OnceLock;

/// One recognized format: extension, canonical MIME type, and the
/// leading-byte patterns that identify it.
#[derive(Debug)]
struct SignatureEntry {
    extension: &'static str,
    content_type: &'static str,
    patterns: &'static [&'static [u8]],
}

/// Registration-ordered table of recognized file signatures.
#[derive(Debug)]
pub struct SignatureCatalog {
    entries: Vec<SignatureEntry>,
}

impl SignatureCatalog {
    fn new() -> Self {
        Self {
            entries: vec![
                SignatureEntry {
                    extension: ".gif",
                    content_type: "image/gif",
                    patterns: &[&[0x47, 0x49, 0x46, 0x38]],
                },
                SignatureEntry {
                    extension: ".png",
                    content_type: "image/png",
                    patterns: &[&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]],
                },
                SignatureEntry {
                    extension: ".jpeg",
                    content_type: "image/jpeg",
                    patterns: &[
                        &[0xFF, 0xD8, 0xFF, 0xE0],
                        &[0xFF, 0xD8, 0xFF, 0xE2],
                        &[0xFF, 0xD8, 0xFF, 0xE3],
                    ],
                },
                SignatureEntry {
                    extension: ".jpg",
                    content_type: "image/jpeg",
                    patterns: &[
                        &[0xFF, 0xD8, 0xFF, 0xE0],
                        &[0xFF, 0xD8, 0xFF, 0xE1],
                        &[0xFF, 0xD8, 0xFF, 0xE8],
                    ],
                },
                SignatureEntry {
                    extension: ".zip",
                    content_type: "application/zip",
                    patterns: &[
                        &[0x50, 0x4B, 0x03, 0x04],
                        &[0x50, 0x4B, 0x4C, 0x49, 0x54, 0x45],
                        &[0x50, 0x4B, 0x53, 0x70, 0x58],
                        &[0x50, 0x4B, 0x05, 0x06],
                        &[0x50, 0x4B, 0x07, 0x08],
                        &[0x57, 0x69, 0x6E, 0x5A, 0x69, 0x70],
                    ],
                },
            ],
        }
    }

    /// Signature patterns registered for `extension` (lowercase, leading dot).
    pub fn signatures_for(&self, extension: &str) -> Option<&[&'static [u8]]> {
        self.entries
            .iter()
            .find(|entry| entry.extension == extension)
            .map(|entry| entry.patterns)
    }

    /// Classify content by its leading bytes.
    ///
    /// Entries are scanned in registration order and the first whose any
    /// pattern matches wins. `.jpeg` and `.jpg` share the `FF D8 FF E0`
    /// prefix, so that prefix classifies as `.jpeg`; the tie-break is
    /// implementation-defined, not a guarantee.
    pub fn extension_by_signature(&self, bytes: &[u8]) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.patterns.iter().any(|pattern| bytes.starts_with(pattern)))
            .map(|entry| entry.extension)
    }

    /// Canonical MIME type for a registered extension.
    ///
    /// Used for response labeling and declared content-type comparison,
    /// never as truth about what the bytes are.
    pub fn content_type_for(&self, extension: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.extension == extension)
            .map(|entry| entry.content_type)
    }
}

static CATALOG: OnceLock<SignatureCatalog> = OnceLock::new();

/// The process-wide signature catalog.
pub fn signature_catalog() -> &'static SignatureCatalog {
    CATALOG.get_or_init(SignatureCatalog::new)
}
