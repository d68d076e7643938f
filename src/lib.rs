//! # imageprep
//!
//! Pre-upload image preparation: validate a user-supplied file, resample it
//! to bounded dimensions, progressively re-encode it toward a byte budget,
//! and wrap it as an inline preview. Every upload surface (avatars, listing
//! photos, identity documents) runs its files through this same pipeline
//! before handing the bytes to a transport.
//!
//! ```no_run
//! use imageprep::{Quality, RustCodec, UploadFile, compress_image};
//!
//! # fn main() -> Result<(), imageprep::PipelineError> {
//! let codec = RustCodec::new();
//! let file = UploadFile::new("listing.jpg", "image/jpeg", std::fs::read("listing.jpg").unwrap());
//!
//! let processed = compress_image(&codec, &file, 500, Quality::new(0.8))?;
//! let preview = processed.to_data_uri();
//! # let _ = preview;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`upload`] | Source-file descriptor, pre-decode validation, size formatting |
//! | [`calculations`] | Pure dimension math: bounded fit, never upscale |
//! | [`params`] | Quality newtype and the compression-loop constants |
//! | [`codec`] | [`RasterCodec`] capability trait + [`Surface`] |
//! | [`rust_codec`] | Production codec on the `image` crate |
//! | [`pipeline`] | [`resize_image`] and [`compress_image`] operations |
//! | [`preview`] | Data-URI previews, lossless wrapping |
//! | [`types`] | [`ImageKind`], [`Dimensions`] |
//!
//! # Design Decisions
//!
//! ## Injected Codec
//!
//! Decode, resample, and encode sit behind the [`RasterCodec`] trait. The
//! pipeline logic itself never touches pixels, so fail-fast validation and
//! the quality search are unit-tested against a scripted mock while
//! [`RustCodec`] carries the real `image`-crate work.
//!
//! ## Format Preservation
//!
//! Output always keeps the source's kind. JPEG honors the quality
//! parameter; PNG, WebP, and GIF take the lossless path and accept but
//! ignore it. Lowering quality on those formats saves no bytes, and
//! callers should not expect it to.
//!
//! ## Best-Effort Byte Budget
//!
//! [`compress_image`] walks quality down in fixed 0.1 steps to a 0.3 floor,
//! re-running each pass from the original bytes so repeated passes never
//! compound generational loss. Meeting the budget is attempted, not
//! guaranteed: the loop stops at the floor regardless. That contract is
//! deliberate and documented, not a gap to quietly close.
//!
//! ## Blocking Stages
//!
//! Every operation is a plain blocking function with one success and one
//! failure outcome. There is no runtime dependency; callers on an async
//! executor wrap calls in their own blocking-task facility. Compression
//! iterations are strictly sequential, and nothing is cached or shared
//! between invocations.

pub mod calculations;
pub mod codec;
pub mod params;
pub mod pipeline;
pub mod preview;
pub mod rust_codec;
pub mod types;
pub mod upload;

pub use calculations::fit_within;
pub use codec::{CodecError, RasterCodec, Surface};
pub use params::{COMPRESSION_MAX_DIMENSION, QUALITY_FLOOR, QUALITY_STEP, Quality};
pub use pipeline::{PipelineError, ProcessedImage, compress_image, resize_image};
pub use preview::{PreviewError, create_image_preview, data_uri};
pub use rust_codec::RustCodec;
pub use types::{Dimensions, ImageKind};
pub use upload::{MAX_UPLOAD_BYTES, UploadFile, ValidationError, format_file_size, validate};
