//! Pure Rust codec: the production [`RasterCodec`] implementation.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF) | `image::load_from_memory_with_format` |
//! | Resample | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality-scaled) |
//! | Encode → PNG | `DynamicImage::write_to` (lossless, quality ignored) |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless, quality ignored) |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` |
//!
//! Decoding uses the *declared* format, so bytes that do not match their
//! declared type fail as a decode error rather than being silently sniffed
//! into something else. Animated GIF input is flattened to its first frame.
//!
//! The `image` crate ships no lossy WebP encoder, so WebP output is lossless
//! regardless of the requested quality. Callers should not expect byte
//! savings from lowering quality on WebP, PNG, or GIF.

use crate::codec::{CodecError, RasterCodec, Surface};
use crate::params::Quality;
use crate::types::{Dimensions, ImageKind};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::io::Cursor;

/// Codec backed by the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Default)]
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Encode as JPEG at the mapped 1–100 quality. JPEG has no alpha channel,
/// so the surface is normalized to RGB8 first.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let rgb = img.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.as_jpeg())
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(buffer.into_inner())
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(buffer.into_inner())
}

/// Lossless WebP. The encoder accepts only RGB8/RGBA8 buffers, so other
/// color types are normalized to RGBA8.
fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Cursor::new(Vec::new());
    let result = match img {
        DynamicImage::ImageRgb8(rgb) => WebPEncoder::new_lossless(&mut buffer).write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        ),
        other => {
            let rgba = other.to_rgba8();
            WebPEncoder::new_lossless(&mut buffer).write_image(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
                ExtendedColorType::Rgba8,
            )
        }
    };
    result.map_err(|e| CodecError::Encode(format!("WebP encode failed: {e}")))?;
    Ok(buffer.into_inner())
}

/// Single-frame GIF. Animated sources were already flattened at decode.
fn encode_gif(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut buffer = Cursor::new(Vec::new());
    GifEncoder::new(&mut buffer)
        .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| CodecError::Encode(format!("GIF encode failed: {e}")))?;
    Ok(buffer.into_inner())
}

impl RasterCodec for RustCodec {
    fn decode(&self, bytes: &[u8], kind: ImageKind) -> Result<Surface, CodecError> {
        image::load_from_memory_with_format(bytes, kind.format())
            .map(Surface::new)
            .map_err(|e| CodecError::Decode(format!("failed to decode as {}: {e}", kind.mime())))
    }

    fn scale(&self, surface: &Surface, target: Dimensions) -> Result<Surface, CodecError> {
        if target.width == 0 || target.height == 0 {
            return Err(CodecError::Surface(format!(
                "cannot allocate a {}x{} surface",
                target.width, target.height
            )));
        }

        Ok(Surface::new(surface.as_image().resize_exact(
            target.width,
            target.height,
            FilterType::Lanczos3,
        )))
    }

    fn encode(
        &self,
        surface: &Surface,
        kind: ImageKind,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        match kind {
            ImageKind::Jpeg => encode_jpeg(surface.as_image(), quality),
            ImageKind::Png => encode_png(surface.as_image()),
            ImageKind::WebP => encode_webp(surface.as_image()),
            ImageKind::Gif => encode_gif(surface.as_image()),
        }
    }
}
