//! Inline preview generation.
//!
//! A preview is a `data:` URI wrapping the blob's bytes verbatim (lossless
//! base64 packaging, never a re-encode) so display surfaces can render it
//! without a network round trip.
//!
//! Preview generation is independent of the blob it reads: a failed preview
//! leaves the processed image untouched and uploadable. Whether to block the
//! upload on a missing preview is the caller's call, not this module's.

use crate::types::ImageKind;
use crate::upload::UploadFile;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("failed to read image data: {0}")]
    Read(#[from] std::io::Error),
}

/// Wrap bytes as a self-contained data URI for the given kind.
pub fn data_uri(kind: ImageKind, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", kind.mime(), STANDARD.encode(bytes))
}

/// Read a blob to the end and wrap it as a data URI.
///
/// Suited to callers holding a stream or file handle rather than a byte
/// buffer; for in-memory blobs use [`UploadFile::to_data_uri`] or
/// [`ProcessedImage::to_data_uri`](crate::pipeline::ProcessedImage::to_data_uri)
/// directly.
pub fn create_image_preview<R: Read>(kind: ImageKind, mut reader: R) -> Result<String, PreviewError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(data_uri(kind, &bytes))
}

impl UploadFile {
    /// Preview of the raw, unprocessed file. Returns `None` when the
    /// declared MIME type is outside the accepted set.
    pub fn to_data_uri(&self) -> Option<String> {
        ImageKind::from_mime(&self.content_type).map(|kind| data_uri(kind, &self.bytes))
    }
}
