//! # wallfit
//!
//! Content-aware wallpaper fitting: rescale and crop arbitrary images to a
//! display resolution while keeping the visually significant region in
//! frame, instead of blindly center-cropping.
//!
//! # Architecture: One Pipeline, Pure Core
//!
//! ```text
//! 1. Scan      CLI inputs  →  image list       (files + walked directories)
//! 2. Process   image list  →  output-images/   (load → fit → save, in parallel)
//! ```
//!
//! The fitting core underneath is a pure function over an in-memory image:
//!
//! ```text
//! resolve ratio ──┬── equal, same size  → no-op
//!                 ├── equal, resizable  → direct Lanczos3 resize
//!                 └── different         → cover-scale → edge-density
//!                                          centroid → clamped crop
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: every sizing decision is a pure function from numbers
//!   to numbers, unit-tested without touching a pixel; the pixel pipeline is
//!   tested on tiny synthetic images.
//! - **Isolation**: each image's pipeline is independent, so batches run on
//!   a rayon pool and one broken file never sinks the rest.
//! - **Reuse**: the core takes and returns `image::DynamicImage` — callers
//!   that aren't the CLI (tests, other tools) use it directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Expands CLI inputs into the processable image list, recording skips |
//! | [`process`] | Parallel load → fit → save stage with per-image progress events |
//! | [`imaging`] | The fitting core: ratio math, cover scaling, centroid detection, crop placement |
//! | [`cache`] | Content-addressed skip of already-generated wallpapers |
//! | [`naming`] | `{stem}-{width}w@{ratio}.{ext}` output naming convention |
//! | [`config`] | Optional `wallfit.toml` defaults (resolution, threshold, masks, workers) |
//! | [`output`] | CLI reporting — pure formatting functions + print wrappers |
//!
//! # Design Decisions
//!
//! ## Centroid Over Saliency Models
//!
//! The "interesting region" detector is deliberately simple: a Laplacian
//! edge map, hard-thresholded, reduced to its intensity-weighted centroid.
//! No face detection, no trained saliency model, no seam carving. For
//! wallpapers the question is only *where to anchor one crop window*, and
//! the edge centroid answers that cheaply and predictably — a flat or
//! featureless image degrades gracefully to a center crop.
//!
//! ## Exact Rational Aspect Ratios
//!
//! Whether an image needs cropping at all is decided by comparing aspect
//! ratios as reduced fractions, not floats: 1920×1080 *is* 1280×720, and
//! 1366×768 is not quite 16:9. Float tolerances would silently reclassify
//! borderline images between the resize and crop paths.
//!
//! ## Pure-Rust Imaging
//!
//! All pixel work goes through the `image` crate — Lanczos3 resampling,
//! 3×3 convolution, grayscale, crop. No ImageMagick, no system
//! dependencies; the binary is fully self-contained.
//!
//! ## Never a Wrong-Sized Output
//!
//! Every exit path of the core returns either exactly the requested
//! dimensions (resize and crop paths) or exactly the original dimensions
//! (the explicit no-op path). The crop window is clamped by translation
//! only, so it cannot shrink; a degenerate feature map falls back to the
//! geometric center rather than failing or distorting.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
