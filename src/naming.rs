//! Centralized output-filename derivation.
//!
//! Every generated wallpaper follows the same naming pattern:
//! `{stem}-{width}w@{ratio}.{ext}`, where the ratio is the *target* ratio in
//! reduced terms. A 1920×1080 fit of `forest.jpg` becomes
//! `forest-1920w@16x9.jpg`. The source extension is preserved so the encoder
//! keeps the input format; sources without an extension get none.
//!
//! Keeping this in one place means the processing stage, the cache, and the
//! CLI reporting all agree on where an output lands.

use crate::imaging::AspectRatio;
use std::path::Path;

/// Format an output filename from its parts.
///
/// ```
/// # use wallfit::naming::format_output_name;
/// # use wallfit::imaging::AspectRatio;
/// let name = format_output_name("forest", 1920, AspectRatio::new(1920, 1080), Some("jpg"));
/// assert_eq!(name, "forest-1920w@16x9.jpg");
/// ```
pub fn format_output_name(
    stem: &str,
    target_width: u32,
    ratio: AspectRatio,
    extension: Option<&str>,
) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{stem}-{target_width}w@{ratio}.{ext}"),
        _ => format!("{stem}-{target_width}w@{ratio}"),
    }
}

/// Derive the output filename for a source path fitted to the target size.
///
/// Returns `None` for paths with no usable file stem (e.g. `..`).
pub fn output_file_name(source: &Path, target_width: u32, target_height: u32) -> Option<String> {
    let stem = source.file_stem()?.to_str()?;
    let extension = source.extension().and_then(|e| e.to_str());
    let ratio = AspectRatio::new(target_width, target_height);
    Some(format_output_name(stem, target_width, ratio, extension))
}
