//! Pure calculation functions for fitting dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! The pixel work (resizing, edge detection, cropping) happens in
//! [`operations`](super::operations) and [`centroid`](super::centroid);
//! this module only decides *which* dimensions and rectangles to use.

use super::ratio::AspectRatio;

/// How a source image should be brought to the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Output the source as-is.
    Unchanged,
    /// Same aspect ratio, different size: one direct resize.
    Resize,
    /// Aspect ratios differ: cover-scale, then crop around the centroid.
    ScaleCrop,
}

/// Decide between no-op, direct resize, and scale-then-crop.
///
/// Ratios are compared as exact rationals. When they match, a resize only
/// happens if upscaling is allowed or the source is strictly larger in
/// *both* dimensions; otherwise the source is returned unchanged.
/// Long-standing behavior, kept verbatim: the larger-in-both condition is
/// written out per axis even though exact ratio equality makes the two
/// axis comparisons agree.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `target` - Target dimensions (width, height)
/// * `allow_upscale` - Whether the image may be scaled up
pub fn resolve_policy(source: (u32, u32), target: (u32, u32), allow_upscale: bool) -> ResizePolicy {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if AspectRatio::new(src_w, src_h) != AspectRatio::new(tgt_w, tgt_h) {
        return ResizePolicy::ScaleCrop;
    }

    if (src_w, src_h) == (tgt_w, tgt_h) {
        return ResizePolicy::Unchanged;
    }

    if allow_upscale || (src_w > tgt_w && src_h > tgt_h) {
        ResizePolicy::Resize
    } else {
        ResizePolicy::Unchanged
    }
}

/// Calculate dimensions that fully cover the target box (resize before crop).
///
/// Scales by the larger of the two per-axis ratios: the driving axis lands
/// exactly on the target size, the other is rounded and comes out equal or
/// larger. On a tie the width axis drives.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `target` - Target box dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Cover dimensions (at least one matches target)
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale_w = tgt_w as f64 / src_w as f64;
    let scale_h = tgt_h as f64 / src_h as f64;

    if scale_w >= scale_h {
        // Width drives: height overshoots (or matches)
        (tgt_w, (src_h as f64 * scale_w).round() as u32)
    } else {
        // Height drives: width overshoots
        ((src_w as f64 * scale_h).round() as u32, tgt_h)
    }
}

/// An axis-aligned crop rectangle in scaled-image coordinates.
///
/// `right`/`bottom` are exclusive and derived from `left`/`top` plus the
/// target size, so the box dimensions never drift from the target by
/// rounding. Coordinates are signed because the initial centroid-centered
/// box may extend past the image before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        (self.right - self.left) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top) as u32
    }
}

/// Compute the target-sized crop box centered on the centroid, translated
/// to stay within the scaled image.
///
/// Clamping is translation-only — the box is never resized — and the four
/// bound checks run in a fixed order (left, top, right, bottom) where a
/// later check overwrites the offset an earlier one set on the same axis.
/// The order is part of the output contract.
///
/// Whenever `target_width <= scaled_width` and `target_height <=
/// scaled_height` (which the cover-fit contract guarantees), the result is
/// fully contained in `[0, scaled_width) × [0, scaled_height)`.
///
/// # Arguments
/// * `centroid` - Detected center of interest (x, y), scaled-image coordinates
/// * `target` - Crop dimensions (width, height)
/// * `scaled` - Dimensions of the image being cropped (width, height)
pub fn crop_box(centroid: (f64, f64), target: (u32, u32), scaled: (u32, u32)) -> CropBox {
    let (tgt_w, tgt_h) = (target.0 as i32, target.1 as i32);
    let (scaled_w, scaled_h) = (scaled.0 as i32, scaled.1 as i32);

    let left = (centroid.0 - target.0 as f64 / 2.0) as i32;
    let top = (centroid.1 - target.1 as f64 / 2.0) as i32;
    let right = left + tgt_w;
    let bottom = top + tgt_h;

    let mut offset_x = 0;
    let mut offset_y = 0;

    if left < 0 {
        offset_x = -left;
    }
    if top < 0 {
        offset_y = -top;
    }
    if right > scaled_w {
        offset_x = scaled_w - right;
    }
    if bottom > scaled_h {
        offset_y = scaled_h - bottom;
    }

    CropBox {
        left: left + offset_x,
        top: top + offset_y,
        right: right + offset_x,
        bottom: bottom + offset_y,
    }
}
