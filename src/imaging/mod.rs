//! Content-aware fitting core — pure Rust, no external tools.
//!
//! | Step | Module / function |
//! |---|---|
//! | **Policy** (resize vs crop vs no-op) | [`calculations::resolve_policy`] |
//! | **Cover-fit scaling** | [`calculations::cover_dimensions`] + Lanczos3 |
//! | **Region of interest** | [`centroid::detect_centroid`] |
//! | **Crop placement** | [`calculations::crop_box`] |
//! | **Orchestration** | [`operations::crop_to_fit`] |
//!
//! The module is split into:
//! - **Ratio**: exact rational aspect ratios (drives branch selection and
//!   output naming)
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Centroid**: edge-density detection of the interesting region
//! - **Operations**: the public [`crop_to_fit`] pipeline combining both
//!   with the `image` crate's pixel operations

pub mod calculations;
pub mod centroid;
pub mod operations;
pub mod ratio;

pub use calculations::{CropBox, ResizePolicy};
pub use centroid::{MaskKind, MaskSettings, detect_centroid, threshold};
pub use operations::{
    CropConfig, CropError, CropReport, DEFAULT_THRESHOLD, FitAction, crop_to_fit,
    crop_to_fit_with_report,
};
pub use ratio::AspectRatio;
