//! Upload-file descriptor and pre-decode validation.
//!
//! Validation is a pure function of the file's *declared* metadata: MIME
//! type string and byte length. It never inspects pixel content, so a file
//! can pass validation and still fail to decode later (corrupt bytes, or a
//! mismatched extension). That split is deliberate: validation is the cheap
//! fail-fast gate that runs before any decode work.

use crate::types::ImageKind;
use thiserror::Error;

/// Hard cap on accepted file size: 5 MiB. Files of exactly this size pass;
/// anything larger is rejected before decode.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// A user-supplied image file: declared MIME type plus raw bytes.
///
/// The MIME type is whatever the file picker or drop event declared. It is
/// trusted for validation and format selection, and contradicted only by a
/// decode failure downstream.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename, preserved for display on derived blobs.
    pub name: String,
    /// Declared MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Rejection reasons for a pre-decode validation check.
///
/// Both variants carry a message fit for direct display to the user; picking
/// a different file always resolves them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unsupported file type: {0}. Please choose a JPEG, PNG, WebP or GIF image.")]
    UnsupportedType(String),
    #[error("File is too large ({0}). The maximum allowed size is 5 MB.")]
    TooLarge(String),
}

/// Check a file's declared type and size before any decode work.
///
/// Pure and idempotent: calling it twice on the same descriptor yields the
/// same result. On success the parsed [`ImageKind`] is returned so callers
/// and downstream stages need not re-parse the MIME string.
pub fn validate(file: &UploadFile) -> Result<ImageKind, ValidationError> {
    let kind = ImageKind::from_mime(&file.content_type)
        .ok_or_else(|| ValidationError::UnsupportedType(file.content_type.clone()))?;

    if file.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge(format_file_size(file.len())));
    }

    Ok(kind)
}

/// Human-readable file size: base-1024 units, two-decimal rounding with
/// trailing zeros trimmed (`1536` → `"1.5 KB"`, `1048576` → `"1 MB"`).
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let value = bytes as f64 / f64::from(1u32 << (10 * exponent)) as f64;

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent as usize])
}
