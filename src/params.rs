//! Parameter types for pipeline operations.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy re-encode fidelity in (0, 1], default 0.9. Clamped on construction.
//!
//! ## Constants
//!
//! The progressive-compression loop is governed by three fixed values:
//! [`COMPRESSION_MAX_DIMENSION`], [`QUALITY_STEP`], and [`QUALITY_FLOOR`].
//! They are not call-site parameters; the loop is meant to be simple and
//! predictable rather than tunable.

/// Upper bound (either axis) applied during progressive compression.
pub const COMPRESSION_MAX_DIMENSION: u32 = 1920;

/// Fixed quality decrement per compression pass.
pub const QUALITY_STEP: f32 = 0.1;

/// Quality below which the compression loop refuses to go, even when the
/// byte budget has not been met.
pub const QUALITY_FLOOR: f32 = 0.3;

/// Smallest quality a caller can request. The valid range is (0, 1], so zero
/// itself is never representable.
const MIN_QUALITY: f32 = 0.01;

/// Re-encode fidelity for lossy output (0–1 scale, 1 = best).
///
/// Lossless kinds (PNG, WebP, GIF) accept a quality but ignore it; callers
/// should not expect byte savings from lowering quality on those formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    /// Clamp `value` into (0, 1]. Non-finite input collapses to full quality.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(MIN_QUALITY, 1.0))
        } else {
            Self(1.0)
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Map to the 1–100 integer scale used by JPEG encoders.
    pub fn as_jpeg(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// One fixed step down, clamped at the compression floor.
    pub(crate) fn stepped_down(self) -> Self {
        Self((self.0 - QUALITY_STEP).max(QUALITY_FLOOR))
    }

    /// True while a further [`stepped_down`](Self::stepped_down) would still
    /// lower fidelity. The epsilon absorbs f32 drift from repeated 0.1
    /// steps, so the floor pass runs exactly once.
    pub(crate) fn above_floor(self) -> bool {
        self.0 > QUALITY_FLOOR + 1e-3
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0.0).value(), MIN_QUALITY);
        assert_eq!(Quality::new(-3.0).value(), MIN_QUALITY);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(1.5).value(), 1.0);
    }

    #[test]
    fn quality_rejects_non_finite() {
        assert_eq!(Quality::new(f32::NAN).value(), 1.0);
        assert_eq!(Quality::new(f32::INFINITY).value(), 1.0);
    }

    #[test]
    fn quality_default_is_point_nine() {
        assert_eq!(Quality::default().value(), 0.9);
    }

    #[test]
    fn as_jpeg_maps_to_encoder_scale() {
        assert_eq!(Quality::new(1.0).as_jpeg(), 100);
        assert_eq!(Quality::new(0.8).as_jpeg(), 80);
        assert_eq!(Quality::new(0.305).as_jpeg(), 31);
        assert_eq!(Quality::new(0.01).as_jpeg(), 1);
    }

    #[test]
    fn stepping_down_clamps_at_floor() {
        let q = Quality::new(0.35).stepped_down();
        assert_eq!(q.value(), QUALITY_FLOOR);
        assert!(!q.above_floor());
    }

    #[test]
    fn repeated_steps_from_point_eight_reach_the_floor() {
        // 0.8 → 0.7 → 0.6 → 0.5 → 0.4 → 0.3; f32 drift must not allow a
        // sixth step.
        let mut q = Quality::new(0.8);
        let mut steps = 0;
        while q.above_floor() {
            q = q.stepped_down();
            steps += 1;
            assert!(steps <= 5, "drifted past the quality floor");
        }
        assert_eq!(steps, 5);
        assert!((q.value() - QUALITY_FLOOR).abs() < 1e-3);
    }
}
