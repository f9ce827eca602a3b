//! High-level fitting operations.
//!
//! [`crop_to_fit`] is the public entry point: it combines the pure
//! calculations with the pixel work and sequences
//! resolve → (cover-scale → detect centroid → crop) | resize | no-op.
//! Inputs are never mutated; every path returns a new image whose size is
//! exactly the target (resize/crop paths) or exactly the source (no-op
//! path), never anything in between.
//!
//! The `_with_report` variant additionally returns a [`CropReport`]
//! describing the decision chain, which the batch layer turns into progress
//! events and which tests assert against directly.

use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;

use super::calculations::{CropBox, ResizePolicy, cover_dimensions, crop_box, resolve_policy};
use super::centroid::{MaskKind, MaskSettings, detect_centroid};

/// Feature-detection cutoff used when none is configured.
pub const DEFAULT_THRESHOLD: u32 = 166;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Knobs for a single fit operation.
///
/// `use_mask_gradient` only has an effect when `use_mask` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropConfig {
    /// Allow images to be scaled up, rather than only down.
    pub allow_upscale: bool,
    /// Feature-detection cutoff, 0-255.
    pub threshold: u32,
    /// Weight edge detection with a center mask.
    pub use_mask: bool,
    /// Use the gradient mask instead of the rectangular one.
    pub use_mask_gradient: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            allow_upscale: false,
            threshold: DEFAULT_THRESHOLD,
            use_mask: false,
            use_mask_gradient: false,
        }
    }
}

impl CropConfig {
    fn validate(&self) -> Result<(), CropError> {
        if self.threshold > 255 {
            return Err(CropError::InvalidConfig(format!(
                "threshold must be between 0 and 255, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    fn mask_settings(&self, target_width: u32, target_height: u32) -> Option<MaskSettings> {
        if !self.use_mask {
            return None;
        }
        let kind = if self.use_mask_gradient {
            MaskKind::Gradient
        } else {
            MaskKind::Rectangular
        };
        Some(MaskSettings {
            kind,
            target_width,
            target_height,
        })
    }
}

/// What the fit pipeline did to one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitAction {
    /// Source already matched, or was smaller with upscaling disabled.
    Unchanged,
    /// Same aspect ratio: one direct resize.
    Resized,
    /// Cover-scaled, centroid detected, cropped.
    Cropped {
        scaled: (u32, u32),
        centroid: (f64, f64),
        crop: CropBox,
    },
}

/// Decision record for one fit, returned alongside the output image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropReport {
    pub source: (u32, u32),
    pub target: (u32, u32),
    pub action: FitAction,
}

/// Fit `image` to the target dimensions, preserving the detected region of
/// interest when cropping is needed.
pub fn crop_to_fit(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    config: &CropConfig,
) -> Result<DynamicImage, CropError> {
    crop_to_fit_with_report(image, target_width, target_height, config).map(|(out, _)| out)
}

/// [`crop_to_fit`], also returning the [`CropReport`] decision record.
pub fn crop_to_fit_with_report(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    config: &CropConfig,
) -> Result<(DynamicImage, CropReport), CropError> {
    config.validate()?;

    let (src_w, src_h) = (image.width(), image.height());
    if target_width == 0 || target_height == 0 {
        return Err(CropError::InvalidDimensions(format!(
            "target dimensions must be positive, got {target_width}x{target_height}"
        )));
    }
    if src_w == 0 || src_h == 0 {
        return Err(CropError::InvalidDimensions(format!(
            "source dimensions must be positive, got {src_w}x{src_h}"
        )));
    }

    let source = (src_w, src_h);
    let target = (target_width, target_height);

    let (out, action) = match resolve_policy(source, target, config.allow_upscale) {
        ResizePolicy::Unchanged => (image.clone(), FitAction::Unchanged),
        ResizePolicy::Resize => (
            image.resize_exact(target_width, target_height, FilterType::Lanczos3),
            FitAction::Resized,
        ),
        ResizePolicy::ScaleCrop => {
            let scaled_dims = cover_dimensions(source, target);
            let scaled = if scaled_dims == source {
                image.clone()
            } else {
                image.resize_exact(scaled_dims.0, scaled_dims.1, FilterType::Lanczos3)
            };

            let centroid = detect_centroid(
                &scaled,
                config.threshold as u8,
                config.mask_settings(target_width, target_height).as_ref(),
            );
            let bx = crop_box(centroid, target, scaled_dims);
            let out = scaled.crop_imm(
                bx.left.max(0) as u32,
                bx.top.max(0) as u32,
                target_width,
                target_height,
            );
            (
                out,
                FitAction::Cropped {
                    scaled: scaled_dims,
                    centroid,
                    crop: bx,
                },
            )
        }
    };

    Ok((
        out,
        CropReport {
            source,
            target,
            action,
        },
    ))
}
