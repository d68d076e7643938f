//! High-level pipeline operations.
//!
//! These functions combine validation, dimension calculations, and codec
//! execution. They take a [`RasterCodec`] so the logic here is testable
//! against the scripted mock in [`codec::tests`](crate::codec).
//!
//! Every stage is a plain blocking call with a single `Result` outcome.
//! Iterations inside [`compress_image`] are strictly sequential: each pass
//! must observe its output size before deciding whether to run another.
//! Nothing is cached and no failed stage is retried: the compression loop
//! is a quality search, not a retry mechanism.

use crate::calculations::fit_within;
use crate::codec::{CodecError, RasterCodec};
use crate::params::{COMPRESSION_MAX_DIMENSION, Quality};
use crate::preview;
use crate::types::{Dimensions, ImageKind};
use crate::upload::{UploadFile, ValidationError, validate};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, warn};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("image processing failed: {0}")]
    Codec(#[from] CodecError),
}

/// An image derived from an [`UploadFile`]: re-encoded, bounded in size,
/// ready to hand to an upload transport.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Source filename, preserved for display.
    pub name: String,
    /// Same kind as the source; processing never switches formats.
    pub kind: ImageKind,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Output raster dimensions.
    pub dimensions: Dimensions,
    /// Stamped at creation; the derived blob is "new", only the filename
    /// carries over from the source.
    pub modified: SystemTime,
}

impl ProcessedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Fractional size in KiB, as compared against compression budgets.
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    /// Wrap the encoded bytes as a self-contained data URI.
    pub fn to_data_uri(&self) -> String {
        preview::data_uri(self.kind, &self.bytes)
    }
}

/// Validate, decode, fit into `max_width` × `max_height`, and re-encode.
///
/// The fit ratio is uniform and never upscales; sources already within
/// bounds skip the resample entirely and are only re-encoded. The output
/// keeps the source's kind and filename.
///
/// Validation runs first, so an unsupported or oversized file is rejected
/// before any decode work happens.
pub fn resize_image(
    codec: &impl RasterCodec,
    file: &UploadFile,
    max_width: u32,
    max_height: u32,
    quality: Quality,
) -> Result<ProcessedImage> {
    let kind = validate(file)?;

    let surface = codec.decode(&file.bytes, kind).inspect_err(|e| {
        warn!(name = %file.name, error = %e, "image decode failed");
    })?;

    let source_dims = surface.dimensions();
    let target = fit_within(source_dims, max_width, max_height);
    debug!(
        name = %file.name,
        source_width = source_dims.width,
        source_height = source_dims.height,
        target_width = target.width,
        target_height = target.height,
        "resizing image"
    );

    let scaled = if target == source_dims {
        surface
    } else {
        codec.scale(&surface, target)?
    };

    let bytes = codec.encode(&scaled, kind, quality)?;

    Ok(ProcessedImage {
        name: file.name.clone(),
        kind,
        bytes,
        dimensions: target,
        modified: SystemTime::now(),
    })
}

/// Progressively re-encode `file` toward a byte budget.
///
/// The first pass resizes to at most 1920×1920 at `initial_quality`. While
/// the output exceeds `max_size_kb` and quality sits above the 0.3 floor,
/// quality drops by a fixed 0.1 step and the whole resize re-runs from the
/// *original* source bytes, so repeated passes never compound generational
/// loss.
///
/// Best-effort, not a guarantee: the loop stops at the quality floor whether
/// or not the budget was met, so the result can still exceed `max_size_kb`.
/// Lossless kinds in particular tend to plateau after the first pass.
pub fn compress_image(
    codec: &impl RasterCodec,
    file: &UploadFile,
    max_size_kb: u32,
    initial_quality: Quality,
) -> Result<ProcessedImage> {
    let bound = COMPRESSION_MAX_DIMENSION;
    let budget = f64::from(max_size_kb);

    let mut quality = initial_quality;
    let mut processed = resize_image(codec, file, bound, bound, quality)?;

    while processed.size_kb() > budget && quality.above_floor() {
        quality = quality.stepped_down();
        debug!(
            name = %file.name,
            size_kb = processed.size_kb(),
            budget_kb = budget,
            next_quality = quality.value(),
            "over budget, lowering quality"
        );
        processed = resize_image(codec, file, bound, bound, quality)?;
    }

    if processed.size_kb() > budget {
        debug!(
            name = %file.name,
            size_kb = processed.size_kb(),
            budget_kb = budget,
            "quality floor reached with budget unmet"
        );
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::{MockCodec, RecordedOp};
    use crate::params::QUALITY_FLOOR;

    const KB: usize = 1024;

    fn jpeg_file(len: usize) -> UploadFile {
        UploadFile::new("holiday.jpg", "image/jpeg", vec![0u8; len])
    }

    #[test]
    fn resize_decodes_fits_scales_encodes_in_order() {
        let codec = MockCodec::scripted(Dimensions::new(4000, 2000), &[50 * KB]);
        let file = jpeg_file(100);

        let out = resize_image(&codec, &file, 1920, 1920, Quality::new(0.8)).unwrap();
        assert_eq!(out.dimensions, Dimensions::new(1920, 960));
        assert_eq!(out.kind, ImageKind::Jpeg);
        assert_eq!(out.len(), 50 * KB);

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], RecordedOp::Decode { len: 100, .. }));
        assert!(matches!(
            ops[1],
            RecordedOp::Scale {
                to: Dimensions {
                    width: 1920,
                    height: 960,
                },
                ..
            }
        ));
        assert!(matches!(
            ops[2],
            RecordedOp::Encode {
                kind: ImageKind::Jpeg,
                dims: Dimensions {
                    width: 1920,
                    height: 960,
                },
                ..
            }
        ));
    }

    #[test]
    fn resize_skips_scaling_when_within_bounds() {
        let codec = MockCodec::scripted(Dimensions::new(200, 100), &[5 * KB]);
        let file = jpeg_file(100);

        let out = resize_image(&codec, &file, 1920, 1920, Quality::default()).unwrap();
        assert_eq!(out.dimensions, Dimensions::new(200, 100));

        // Decode then encode; no scale op was issued.
        let ops = codec.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(!ops.iter().any(|op| matches!(op, RecordedOp::Scale { .. })));
    }

    #[test]
    fn resize_preserves_name_and_kind() {
        let codec = MockCodec::scripted(Dimensions::new(800, 800), &[KB]);
        let file = UploadFile::new("id-card.png", "image/png", vec![0u8; 100]);

        let out = resize_image(&codec, &file, 400, 400, Quality::default()).unwrap();
        assert_eq!(out.name, "id-card.png");
        assert_eq!(out.kind, ImageKind::Png);
    }

    #[test]
    fn resize_rejects_invalid_file_before_any_codec_work() {
        let codec = MockCodec::new();
        let file = UploadFile::new("doc.pdf", "application/pdf", vec![0u8; 100]);

        let result = resize_image(&codec, &file, 1920, 1920, Quality::default());
        assert!(matches!(
            result,
            Err(PipelineError::Invalid(ValidationError::UnsupportedType(_)))
        ));
        assert!(codec.get_operations().is_empty(), "no decode may happen");
    }

    #[test]
    fn resize_rejects_oversized_file_before_any_codec_work() {
        let codec = MockCodec::new();
        let file = jpeg_file(6 * 1024 * KB);

        let result = resize_image(&codec, &file, 1920, 1920, Quality::default());
        assert!(matches!(
            result,
            Err(PipelineError::Invalid(ValidationError::TooLarge(_)))
        ));
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn resize_propagates_decode_failure() {
        // Empty script: the mock's decode fails like a corrupt file would.
        let codec = MockCodec::new();
        let result = resize_image(&codec, &jpeg_file(10), 1920, 1920, Quality::default());
        assert!(matches!(
            result,
            Err(PipelineError::Codec(CodecError::Decode(_)))
        ));
    }

    #[test]
    fn compress_stops_once_budget_is_met() {
        // First pass lands at 200 KB, second at 90 KB, under the 100 KB
        // budget, so exactly two passes run.
        let codec = MockCodec::scripted(Dimensions::new(4000, 3000), &[200 * KB, 90 * KB]);
        let file = jpeg_file(500);

        let out = compress_image(&codec, &file, 100, Quality::new(0.8)).unwrap();
        assert_eq!(out.len(), 90 * KB);

        let qualities = codec.encode_qualities();
        assert_eq!(qualities.len(), 2);
        assert!((qualities[0] - 0.8).abs() < 1e-6);
        assert!((qualities[1] - 0.7).abs() < 1e-3);
    }

    #[test]
    fn compress_single_pass_when_already_under_budget() {
        let codec = MockCodec::scripted(Dimensions::new(800, 600), &[40 * KB]);
        let file = jpeg_file(500);

        let out = compress_image(&codec, &file, 100, Quality::new(0.8)).unwrap();
        assert_eq!(out.len(), 40 * KB);
        assert_eq!(codec.encode_qualities().len(), 1);
    }

    #[test]
    fn compress_terminates_at_quality_floor_with_budget_unmet() {
        // Every pass comes back over budget: the loop must walk
        // 0.8 → 0.7 → 0.6 → 0.5 → 0.4 → 0.3 and stop, budget still unmet.
        let sizes = vec![500 * KB; 6];
        let codec = MockCodec::scripted(Dimensions::new(4000, 3000), &sizes);
        let file = jpeg_file(500);

        let out = compress_image(&codec, &file, 100, Quality::new(0.8)).unwrap();
        assert_eq!(out.len(), 500 * KB, "budget is best-effort, not enforced");

        let qualities = codec.encode_qualities();
        assert_eq!(qualities.len(), 6, "no pass may run below the floor");
        assert!((qualities[0] - 0.8).abs() < 1e-6);
        for pair in qualities.windows(2) {
            assert!((pair[0] - pair[1] - 0.1).abs() < 1e-3, "fixed 0.1 steps");
        }
        assert!((qualities[5] - QUALITY_FLOOR).abs() < 1e-3);
    }

    #[test]
    fn compress_bounds_every_pass_at_1920() {
        let codec = MockCodec::scripted(Dimensions::new(4000, 2000), &[300 * KB, 50 * KB]);
        let file = jpeg_file(500);

        compress_image(&codec, &file, 100, Quality::new(0.8)).unwrap();

        for op in codec.get_operations() {
            if let RecordedOp::Scale { to, .. } = op {
                assert_eq!(to, Dimensions::new(1920, 960));
            }
        }
    }

    #[test]
    fn compress_reruns_from_original_source_each_pass() {
        // Every decode sees the original byte length, not the previous
        // pass's output.
        let codec = MockCodec::scripted(Dimensions::new(4000, 3000), &[300 * KB, 200 * KB, 90 * KB]);
        let file = jpeg_file(777);

        compress_image(&codec, &file, 100, Quality::new(0.8)).unwrap();

        let decodes: Vec<usize> = codec
            .get_operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Decode { len, .. } => Some(len),
                _ => None,
            })
            .collect();
        assert_eq!(decodes, vec![777, 777, 777]);
    }

    #[test]
    fn processed_image_size_kb_is_fractional() {
        let codec = MockCodec::scripted(Dimensions::new(100, 100), &[1536]);
        let out = resize_image(&codec, &jpeg_file(10), 1920, 1920, Quality::default()).unwrap();
        assert_eq!(out.size_kb(), 1.5);
    }
}
