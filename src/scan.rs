//! Input enumeration.
//!
//! Expands the CLI's input arguments — individual files or whole
//! directories — into the list of images the processing stage will fit.
//! Directories are walked recursively; anything that isn't a decodable
//! image is passed over.
//!
//! Problems with *explicitly named* inputs (missing file, unsupported
//! extension, unreadable directory entry) are recorded as skips with a
//! reason instead of aborting: a batch keeps going, and the skip list is
//! reported at the end. Non-image files encountered while walking a
//! directory are filtered silently — directories legitimately contain
//! other things.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions whose decoders are compiled in (see the `image` features in
/// Cargo.toml).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// One image queued for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
}

/// Why an explicitly named input was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    UnsupportedExtension,
    Unreadable,
}

/// A passed-over input, kept for end-of-run reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Everything the scan found, in deterministic (sorted) order.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub images: Vec<SourceImage>,
    pub skipped: Vec<SkippedEntry>,
}

/// Check whether a path has a decodable image extension.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Expand files and directories into the processable image list.
pub fn scan(inputs: &[PathBuf]) -> ScanResult {
    let mut result = ScanResult::default();

    for input in inputs {
        if input.is_dir() {
            scan_directory(input, &mut result);
        } else if !input.exists() {
            result.skipped.push(SkippedEntry {
                path: input.clone(),
                reason: SkipReason::NotFound,
            });
        } else if !has_image_extension(input) {
            result.skipped.push(SkippedEntry {
                path: input.clone(),
                reason: SkipReason::UnsupportedExtension,
            });
        } else {
            result.images.push(SourceImage {
                path: input.clone(),
            });
        }
    }

    result.images.sort_by(|a, b| a.path.cmp(&b.path));
    result.images.dedup();
    result
}

fn scan_directory(dir: &Path, result: &mut ScanResult) {
    for entry in WalkDir::new(dir).follow_links(true) {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file() && has_image_extension(path) {
                    result.images.push(SourceImage {
                        path: path.to_path_buf(),
                    });
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf());
                result.skipped.push(SkippedEntry {
                    path,
                    reason: SkipReason::Unreadable,
                });
            }
        }
    }
}
