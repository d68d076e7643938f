//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::types::Dimensions;

/// Fit `source` inside `max_width` × `max_height`, preserving aspect ratio.
///
/// A single uniform ratio `min(max_width/width, max_height/height)` is
/// applied, clamped to ≤ 1: sources already within bounds are returned
/// unchanged, never upscaled. The scaled axes use floor semantics.
///
/// Implemented with integer cross-multiplication rather than float ratios so
/// that bound-exact inputs land exactly on the bound: 4000×2000 into
/// 1920×1920 yields 1920×960, and 3000×3000 into 400×400 yields 400×400,
/// with no rounding drift.
///
/// Extreme aspect ratios can floor the minor axis to 0 (e.g. 10000×1 into
/// 1920×1920). That degenerate target is rejected later, at surface
/// allocation time, not silently bumped here.
///
/// # Examples
/// ```
/// # use imageprep::{Dimensions, fit_within};
/// // Landscape source bounded by width: 4000x2000 → 1920x960
/// assert_eq!(
///     fit_within(Dimensions::new(4000, 2000), 1920, 1920),
///     Dimensions::new(1920, 960),
/// );
///
/// // Already within bounds: unchanged, never enlarged
/// assert_eq!(
///     fit_within(Dimensions::new(200, 100), 1920, 1920),
///     Dimensions::new(200, 100),
/// );
/// ```
pub fn fit_within(source: Dimensions, max_width: u32, max_height: u32) -> Dimensions {
    if source.fits_within(max_width, max_height) {
        return source;
    }

    // Compare max_width/width against max_height/height without dividing:
    // the smaller ratio is the binding axis.
    let width_bound = max_width as u64 * source.height as u64;
    let height_bound = max_height as u64 * source.width as u64;

    if width_bound <= height_bound {
        Dimensions {
            width: max_width,
            height: (source.height as u64 * max_width as u64 / source.width as u64) as u32,
        }
    } else {
        Dimensions {
            width: (source.width as u64 * max_height as u64 / source.height as u64) as u32,
            height: max_height,
        }
    }
}
