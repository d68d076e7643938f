//! Raster codec trait and shared types.
//!
//! The [`RasterCodec`] trait defines the three operations the pipeline needs
//! from its host environment: decode bytes into a raster surface, resample a
//! surface to exact dimensions, and encode a surface back into bytes.
//!
//! Keeping decode/scale/encode behind a trait means the pipeline logic
//! (fit computation, the progressive-compression loop, fail-fast validation)
//! is testable against a scripted mock without touching pixels. The
//! production implementation is [`RustCodec`](super::rust_codec::RustCodec).

use crate::params::Quality;
use crate::types::{Dimensions, ImageKind};
use image::DynamicImage;
use thiserror::Error;

/// Codec failures, by stage.
///
/// `Decode` is terminal for that input (corrupt bytes, or content that does
/// not match the declared type). `Surface` is an environment-level failure to
/// allocate or produce a raster surface. `Encode` is terminal for that
/// attempt. None of them are retried by the pipeline.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("could not produce raster surface: {0}")]
    Surface(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// A decoded pixel grid, prior to re-encoding.
///
/// Opaque outside the codec: the pipeline only ever asks for its dimensions
/// and hands it back to the codec that produced it.
#[derive(Debug, Clone)]
pub struct Surface {
    image: DynamicImage,
}

impl Surface {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub(crate) fn as_image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Capability trait for raster decode/scale/encode.
///
/// Every implementation must uphold two contracts the pipeline relies on:
/// `scale` produces a surface of exactly the requested dimensions, and
/// `encode` preserves the requested kind (it may ignore `quality` for
/// lossless kinds, but must not switch formats).
pub trait RasterCodec {
    /// Decode raw bytes declared to be `kind` into a raster surface.
    fn decode(&self, bytes: &[u8], kind: ImageKind) -> Result<Surface, CodecError>;

    /// Resample a surface to exactly `target`.
    fn scale(&self, surface: &Surface, target: Dimensions) -> Result<Surface, CodecError>;

    /// Encode a surface as `kind` at the given quality.
    fn encode(
        &self,
        surface: &Surface,
        kind: ImageKind,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError>;
}
