//! CLI output formatting.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ```text
//! Optimising wallpapers for 1920x1080 (16x9)
//! forest.jpg → forest-1920w@16x9.jpg
//! dunes.png → dunes-1920w@16x9.png (cached)
//! broken.jpg: FAILED (Failed to decode ...)
//!
//! Processed 2 wallpapers (1 cached, 1 encoded), 1 failed
//! ```
//!
//! With `--verbose`, fitted images additionally show the decision the core
//! took (no-op, direct resize, or scale + centroid crop):
//!
//! ```text
//! forest.jpg → forest-1920w@16x9.jpg
//!     2000x1000 scaled to 2160x1080, centroid (980.4, 512.7), crop from (110, 0)
//! ```

use crate::imaging::{AspectRatio, FitAction};
use crate::process::{ProcessEvent, ProcessOutcome};
use crate::scan::{ScanResult, SkipReason};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Header line for a run: target resolution plus its reduced ratio.
pub fn format_run_header(target_width: u32, target_height: u32) -> String {
    let ratio = AspectRatio::new(target_width, target_height);
    format!("Optimising wallpapers for {target_width}x{target_height} ({ratio})")
}

/// Summarize what the scan found, including explicit inputs that were
/// passed over and why.
pub fn format_scan_summary(result: &ScanResult) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("Found {} image(s)", result.images.len()));
    for skip in &result.skipped {
        let reason = match skip.reason {
            SkipReason::NotFound => "not found",
            SkipReason::UnsupportedExtension => "unsupported format",
            SkipReason::Unreadable => "unreadable",
        };
        lines.push(format!(
            "{}Skipped {} ({reason})",
            indent(1),
            skip.path.display()
        ));
    }
    lines
}

/// Format one processing event. Returns no lines for events below the
/// current verbosity — failures always print.
pub fn format_process_event(event: &ProcessEvent, verbose: bool) -> Vec<String> {
    match event {
        ProcessEvent::Started { .. } => Vec::new(),
        ProcessEvent::Cached { name, output } => {
            vec![format!("{name} → {output} (cached)")]
        }
        ProcessEvent::Fitted { name, output, report } => {
            let mut lines = vec![format!("{name} → {output}")];
            if verbose {
                lines.push(format!("{}{}", indent(1), describe_action(report.source, &report.action)));
            }
            lines
        }
        ProcessEvent::Failed { name, error } => {
            vec![format!("{name}: FAILED ({error})")]
        }
    }
}

fn describe_action(source: (u32, u32), action: &FitAction) -> String {
    match action {
        FitAction::Unchanged => format!("{}x{} accepted as-is", source.0, source.1),
        FitAction::Resized => format!("{}x{} resized directly", source.0, source.1),
        FitAction::Cropped {
            scaled,
            centroid,
            crop,
        } => format!(
            "{}x{} scaled to {}x{}, centroid ({:.1}, {:.1}), crop from ({}, {})",
            source.0, source.1, scaled.0, scaled.1, centroid.0, centroid.1, crop.left, crop.top
        ),
    }
}

/// End-of-run totals.
pub fn format_run_summary(outcome: &ProcessOutcome) -> Vec<String> {
    let mut lines = Vec::new();
    let failed = if outcome.failures.is_empty() {
        String::new()
    } else {
        format!(", {} failed", outcome.failures.len())
    };
    lines.push(format!(
        "Processed {} wallpaper(s) ({}){failed}",
        outcome.completed.len(),
        outcome.cache_stats,
    ));
    for failure in &outcome.failures {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            failure.source.display(),
            failure.error
        ));
    }
    lines
}

pub fn print_run_header(target_width: u32, target_height: u32) {
    println!("{}", format_run_header(target_width, target_height));
}

pub fn print_scan_summary(result: &ScanResult) {
    for line in format_scan_summary(result) {
        println!("{line}");
    }
}

pub fn print_run_summary(outcome: &ProcessOutcome) {
    for line in format_run_summary(outcome) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStats;
    use crate::imaging::{CropBox, CropReport};
    use crate::process::{FailedImage, ProcessedImage};
    use crate::scan::SkippedEntry;
    use std::path::PathBuf;

    #[test]
    fn run_header_shows_reduced_ratio() {
        assert_eq!(
            format_run_header(1920, 1080),
            "Optimising wallpapers for 1920x1080 (16x9)"
        );
    }

    #[test]
    fn scan_summary_lists_skips_with_reasons() {
        let result = ScanResult {
            images: vec![],
            skipped: vec![SkippedEntry {
                path: PathBuf::from("notes.txt"),
                reason: SkipReason::UnsupportedExtension,
            }],
        };
        let lines = format_scan_summary(&result);
        assert_eq!(lines[0], "Found 0 image(s)");
        assert_eq!(lines[1], "    Skipped notes.txt (unsupported format)");
    }

    #[test]
    fn started_event_prints_nothing() {
        let event = ProcessEvent::Started {
            name: "a.jpg".into(),
        };
        assert!(format_process_event(&event, true).is_empty());
    }

    #[test]
    fn fitted_event_without_verbose_is_one_line() {
        let event = ProcessEvent::Fitted {
            name: "forest.jpg".into(),
            output: "forest-1920w@16x9.jpg".into(),
            report: CropReport {
                source: (2000, 1000),
                target: (1920, 1080),
                action: FitAction::Resized,
            },
        };
        let lines = format_process_event(&event, false);
        assert_eq!(lines, vec!["forest.jpg → forest-1920w@16x9.jpg"]);
    }

    #[test]
    fn fitted_event_verbose_describes_the_crop() {
        let event = ProcessEvent::Fitted {
            name: "forest.jpg".into(),
            output: "forest-1920w@16x9.jpg".into(),
            report: CropReport {
                source: (2000, 1000),
                target: (1920, 1080),
                action: FitAction::Cropped {
                    scaled: (2160, 1080),
                    centroid: (980.44, 512.71),
                    crop: CropBox {
                        left: 110,
                        top: 0,
                        right: 2030,
                        bottom: 1080,
                    },
                },
            },
        };
        let lines = format_process_event(&event, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "    2000x1000 scaled to 2160x1080, centroid (980.4, 512.7), crop from (110, 0)"
        );
    }

    #[test]
    fn cached_and_failed_events_format() {
        let cached = ProcessEvent::Cached {
            name: "a.jpg".into(),
            output: "a-1920w@16x9.jpg".into(),
        };
        assert_eq!(
            format_process_event(&cached, false),
            vec!["a.jpg → a-1920w@16x9.jpg (cached)"]
        );

        let failed = ProcessEvent::Failed {
            name: "b.jpg".into(),
            error: "boom".into(),
        };
        assert_eq!(format_process_event(&failed, false), vec!["b.jpg: FAILED (boom)"]);
    }

    #[test]
    fn run_summary_counts_and_failures() {
        let outcome = ProcessOutcome {
            completed: vec![ProcessedImage {
                source: PathBuf::from("a.jpg"),
                output: "a-1920w@16x9.jpg".into(),
                cached: true,
                report: None,
            }],
            failures: vec![FailedImage {
                source: PathBuf::from("b.jpg"),
                error: "decode failed".into(),
            }],
            cache_stats: CacheStats { hits: 1, misses: 0 },
        };
        let lines = format_run_summary(&outcome);
        assert_eq!(lines[0], "Processed 1 wallpaper(s) (1 cached, 0 encoded), 1 failed");
        assert_eq!(lines[1], "    b.jpg: decode failed");
    }
}
