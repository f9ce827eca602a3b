//! Edge-density centroid detection.
//!
//! Finds the "interesting" region of an image as the intensity-weighted
//! centroid of a thresholded edge map. The pipeline:
//!
//! 1. Laplacian edge filter over the RGB image, then invert (low-edge
//!    regions read bright).
//! 2. Optional weighting mask, painted over the inverted map as an opaque
//!    white stencil. Across the two inversions this multiplies edge
//!    magnitudes by `1 - mask/255`: a high mask value *suppresses* features.
//! 3. Invert back, convert to grayscale, and binarize with a hard
//!    [`threshold`].
//! 4. Weighted centroid over the binary map. A blank map (flat source, or a
//!    cutoff nothing survives) falls back to the geometric center instead of
//!    dividing by zero.
//!
//! Two mask shapes exist. The *rectangular* mask fills the center of the
//! frame (inset from each edge by twice the width/height delta to the
//! target), pushing detection toward the borders. The *gradient* mask is a
//! vertical 0→254→0 ramp: a gentler bias that mostly discounts the vertical
//! middle of the frame.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// PIL-style FIND_EDGES kernel: 3×3 Laplacian.
const EDGE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Native height of the gradient ramp before it is stretched to the image.
const RAMP_HEIGHT: u32 = 511;

/// Which weighting mask to apply before thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// Suppress a center rectangle inset by `2 × |dim − target_dim|` per axis.
    Rectangular,
    /// Vertical 0→254→0 ramp, nearest-neighbor stretched to the image.
    Gradient,
}

/// Mask configuration for [`detect_centroid`].
///
/// The target dimensions size the rectangular variant's inset; the gradient
/// variant ignores them.
#[derive(Debug, Clone, Copy)]
pub struct MaskSettings {
    pub kind: MaskKind,
    pub target_width: u32,
    pub target_height: u32,
}

/// Hard binarization predicate: strictly above the cutoff is a feature.
pub fn threshold(value: u8, cutoff: u8) -> u8 {
    if value > cutoff { 255 } else { 0 }
}

/// Locate the centroid of edge density in `image`.
///
/// Returns (x, y) in the coordinate space of `image`. For a blank feature
/// map — a flat-color source, or a `cutoff` that filters everything out —
/// returns the geometric center `(width/2, height/2)` rather than failing.
pub fn detect_centroid(
    image: &DynamicImage,
    cutoff: u8,
    mask: Option<&MaskSettings>,
) -> (f64, f64) {
    let (width, height) = (image.width(), image.height());

    let mut edges: RgbImage = imageops::filter3x3(&image.to_rgb8(), &EDGE_KERNEL);
    imageops::invert(&mut edges);

    if let Some(settings) = mask {
        let mask = match settings.kind {
            MaskKind::Gradient => gradient_mask(width, height),
            MaskKind::Rectangular => {
                rectangular_mask(width, height, settings.target_width, settings.target_height)
            }
        };
        overlay_stencil(&mut edges, &mask);
    }

    imageops::invert(&mut edges);
    let mut features = imageops::grayscale(&edges);
    for px in features.pixels_mut() {
        px.0[0] = threshold(px.0[0], cutoff);
    }

    match weighted_center(&features) {
        Some(centroid) => centroid,
        None => (width as f64 / 2.0, height as f64 / 2.0),
    }
}

/// Vertical ramp mask: a 1×511 column running 0→254→0, stretched to the
/// image size with nearest-neighbor sampling (no smoothing).
fn gradient_mask(width: u32, height: u32) -> GrayImage {
    let ramp = GrayImage::from_fn(1, RAMP_HEIGHT, |_, y| {
        let value = 254 - (254 - y as i32).abs();
        Luma([value.max(0) as u8])
    });
    imageops::resize(&ramp, width, height, FilterType::Nearest)
}

/// Center-rectangle mask: full weight inside a rectangle inset from each
/// edge by twice the per-axis delta between the image and target sizes,
/// zero in the border band. An inset that consumes the whole axis leaves
/// the mask all-zero (no suppression).
fn rectangular_mask(width: u32, height: u32, target_width: u32, target_height: u32) -> GrayImage {
    let inset_x = 2 * width.abs_diff(target_width);
    let inset_y = 2 * height.abs_diff(target_height);

    GrayImage::from_fn(width, height, |x, y| {
        let inside_x = x >= inset_x && x < width.saturating_sub(inset_x);
        let inside_y = y >= inset_y && y < height.saturating_sub(inset_y);
        Luma([if inside_x && inside_y { 255 } else { 0 }])
    })
}

/// Paint opaque white through `mask` (used as an 8-bit alpha stencil,
/// anchored at the origin) onto `base`.
fn overlay_stencil(base: &mut RgbImage, mask: &GrayImage) {
    for (x, y, px) in base.enumerate_pixels_mut() {
        let alpha = mask.get_pixel(x, y).0[0] as u32;
        for channel in px.0.iter_mut() {
            let c = *channel as u32;
            *channel = ((c * (255 - alpha) + 255 * alpha) / 255) as u8;
        }
    }
}

/// Intensity-weighted centroid of a grayscale map, or `None` if the map
/// carries no weight at all.
fn weighted_center(map: &GrayImage) -> Option<(f64, f64)> {
    let mut total: u64 = 0;
    let mut weighted_x: u64 = 0;
    let mut weighted_y: u64 = 0;

    for (x, y, px) in map.enumerate_pixels() {
        let value = px.0[0] as u64;
        total += value;
        weighted_x += x as u64 * value;
        weighted_y += y as u64 * value;
    }

    if total == 0 {
        return None;
    }
    Some((
        weighted_x as f64 / total as f64,
        weighted_y as f64 / total as f64,
    ))
}
