//! Shared types used across all pipeline stages.

use image::ImageFormat;

/// MIME strings accepted at validation time, paired with their parsed kind.
///
/// `image/jpg` is not a registered MIME type but browsers and file pickers
/// emit it anyway, so it is accepted as an alias for JPEG.
const MIME_CANDIDATES: &[(&str, ImageKind)] = &[
    ("image/jpeg", ImageKind::Jpeg),
    ("image/jpg", ImageKind::Jpeg),
    ("image/png", ImageKind::Png),
    ("image/webp", ImageKind::WebP),
    ("image/gif", ImageKind::Gif),
];

/// The set of image formats the pipeline accepts and preserves.
///
/// A processed image always keeps the kind of its source: a JPEG stays a
/// JPEG, a PNG stays a PNG. Formats outside this set fail validation before
/// any decode work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl ImageKind {
    /// Parse a declared MIME type string. Matching is ASCII case-insensitive.
    ///
    /// Returns `None` for anything outside the accepted set, including
    /// non-image types and image types with no decoder compiled in.
    pub fn from_mime(mime: &str) -> Option<Self> {
        MIME_CANDIDATES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(mime.trim()))
            .map(|(_, kind)| *kind)
    }

    /// Canonical MIME type, as used in data URIs.
    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
            ImageKind::Gif => "image/gif",
        }
    }

    pub(crate) fn format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::WebP => ImageFormat::WebP,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }
}

/// Pixel dimensions measured from decoded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when this fits inside `max_width` × `max_height` without scaling.
    pub fn fits_within(self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}
