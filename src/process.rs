//! Batch fitting stage.
//!
//! Takes the scanned image list and runs every image through the core
//! pipeline: load → [`crop_to_fit_with_report`] → save under the derived
//! output name. Each image's pipeline is independent; images are processed
//! in parallel with [rayon](https://docs.rs/rayon), and a failure in one
//! image is recorded and reported without touching the rest of the batch.
//!
//! ## Output Structure
//!
//! ```text
//! output-images/
//! ├── .wallfit-cache.json        # Cache manifest (skip unchanged work)
//! ├── forest-1920w@16x9.jpg
//! ├── dunes-1920w@16x9.png
//! └── ...
//! ```
//!
//! ## Progress Events
//!
//! Callers may pass an `mpsc::Sender<ProcessEvent>`; the stage emits one
//! event per image as work happens, and the caller's printer thread decides
//! what to show. The stage itself never writes to stdout, and the core
//! below it stays observer-free — it just returns its [`CropReport`].

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use thiserror::Error;

use crate::cache::{self, CacheManifest, CacheStats};
use crate::imaging::{CropConfig, CropError, CropReport, crop_to_fit_with_report};
use crate::naming;
use crate::scan::SourceImage;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {0}: {1}")]
    Decode(PathBuf, String),
    #[error("Failed to encode {0}: {1}")]
    Encode(PathBuf, String),
    #[error(transparent)]
    Fit(#[from] CropError),
    #[error("Unusable source filename: {0}")]
    BadName(PathBuf),
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub target_width: u32,
    pub target_height: u32,
    pub crop: CropConfig,
    pub use_cache: bool,
}

/// Progress notification for a single image.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Started { name: String },
    Fitted { name: String, output: String, report: CropReport },
    Cached { name: String, output: String },
    Failed { name: String, error: String },
}

/// One successfully handled image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub output: String,
    pub cached: bool,
    /// `None` when the output came from the cache.
    pub report: Option<CropReport>,
}

/// One image whose pipeline failed; the rest of the batch is unaffected.
#[derive(Debug, Clone)]
pub struct FailedImage {
    pub source: PathBuf,
    pub error: String,
}

/// Batch result summary.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub completed: Vec<ProcessedImage>,
    pub failures: Vec<FailedImage>,
    pub cache_stats: CacheStats,
}

/// Fit every scanned image to the target and write the results.
///
/// Only failures of the *stage itself* (creating the output directory,
/// persisting the cache manifest) surface as `Err`; per-image failures are
/// collected in the returned [`ProcessOutcome`].
pub fn process(
    images: &[SourceImage],
    output_dir: &Path,
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessOutcome, ProcessError> {
    std::fs::create_dir_all(output_dir)?;

    let manifest = if options.use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };
    let params_hash = cache::hash_params(&params_description(options));

    // rayon workers share the sender behind a mutex; sends are quick
    let events = events.map(Mutex::new);
    let emit = |event: ProcessEvent| {
        // A dropped receiver just means nobody is listening
        if let Some(sender) = &events
            && let Ok(sender) = sender.lock()
        {
            let _ = sender.send(event);
        }
    };

    let results: Vec<(PathBuf, Result<Worked, ProcessError>)> = images
        .par_iter()
        .map(|image| {
            let outcome = fit_one(image, output_dir, options, &manifest, &params_hash, &emit);
            (image.path.clone(), outcome)
        })
        .collect();

    let mut manifest = manifest;
    let mut completed = Vec::new();
    let mut failures = Vec::new();
    let mut cache_stats = CacheStats::default();

    for (source, result) in results {
        match result {
            Ok(worked) => {
                if worked.image.cached {
                    cache_stats.hits += 1;
                } else {
                    cache_stats.misses += 1;
                    manifest.insert(&worked.image.output, worked.source_hash, params_hash.clone());
                }
                completed.push(worked.image);
            }
            Err(err) => failures.push(FailedImage {
                source,
                error: err.to_string(),
            }),
        }
    }

    manifest.save(output_dir)?;

    Ok(ProcessOutcome {
        completed,
        failures,
        cache_stats,
    })
}

/// Per-image result plus the source hash the manifest update needs.
struct Worked {
    image: ProcessedImage,
    source_hash: String,
}

fn fit_one(
    image: &SourceImage,
    output_dir: &Path,
    options: &ProcessOptions,
    manifest: &CacheManifest,
    params_hash: &str,
    emit: &impl Fn(ProcessEvent),
) -> Result<Worked, ProcessError> {
    let name = image
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ProcessError::BadName(image.path.clone()))?;
    emit(ProcessEvent::Started { name: name.clone() });

    let run = || -> Result<Worked, ProcessError> {
        let output =
            naming::output_file_name(&image.path, options.target_width, options.target_height)
                .ok_or_else(|| ProcessError::BadName(image.path.clone()))?;
        let source_hash = cache::hash_file(&image.path)?;

        if options.use_cache && manifest.is_hit(output_dir, &output, &source_hash, params_hash) {
            emit(ProcessEvent::Cached {
                name: name.clone(),
                output: output.clone(),
            });
            return Ok(Worked {
                image: ProcessedImage {
                    source: image.path.clone(),
                    output,
                    cached: true,
                    report: None,
                },
                source_hash,
            });
        }

        let source = image::open(&image.path)
            .map_err(|e| ProcessError::Decode(image.path.clone(), e.to_string()))?;
        let (fitted, report) = crop_to_fit_with_report(
            &source,
            options.target_width,
            options.target_height,
            &options.crop,
        )?;

        let output_path = output_dir.join(&output);
        fitted
            .save(&output_path)
            .map_err(|e| ProcessError::Encode(output_path.clone(), e.to_string()))?;

        emit(ProcessEvent::Fitted {
            name: name.clone(),
            output: output.clone(),
            report,
        });
        Ok(Worked {
            image: ProcessedImage {
                source: image.path.clone(),
                output,
                cached: false,
                report: Some(report),
            },
            source_hash,
        })
    };

    run().inspect_err(|err| {
        emit(ProcessEvent::Failed {
            name,
            error: err.to_string(),
        });
    })
}

/// Stable description of everything that affects output pixels; hashed
/// into the cache key.
fn params_description(options: &ProcessOptions) -> String {
    format!(
        "{}x{}:t{}:u{}:m{}:g{}",
        options.target_width,
        options.target_height,
        options.crop.threshold,
        options.crop.allow_upscale,
        options.crop.use_mask,
        options.crop.use_mask_gradient,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, Rgb, RgbImage};
    use std::sync::mpsc;
    use tempfile::TempDir;

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    fn options(width: u32, height: u32) -> ProcessOptions {
        ProcessOptions {
            target_width: width,
            target_height: height,
            crop: CropConfig::default(),
            use_cache: true,
        }
    }

    fn sources(paths: &[&Path]) -> Vec<SourceImage> {
        paths
            .iter()
            .map(|p| SourceImage {
                path: p.to_path_buf(),
            })
            .collect()
    }

    #[test]
    fn fits_and_saves_every_image() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        let b = tmp.path().join("b.jpg");
        create_test_jpeg(&a, 80, 40);
        create_test_jpeg(&b, 60, 60);
        let out = tmp.path().join("out");

        let outcome = process(&sources(&[&a, &b]), &out, &options(40, 30), None).unwrap();

        assert_eq!(outcome.completed.len(), 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.cache_stats.misses, 2);

        let fitted = image::open(out.join("a-40w@4x3.jpg")).unwrap();
        assert_eq!((fitted.width(), fitted.height()), (40, 30));
        assert!(out.join("b-40w@4x3.jpg").exists());
    }

    #[test]
    fn one_bad_image_does_not_sink_the_batch() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.jpg");
        let bad = tmp.path().join("bad.jpg");
        create_test_jpeg(&good, 80, 40);
        std::fs::write(&bad, b"not actually a jpeg").unwrap();
        let out = tmp.path().join("out");

        let outcome = process(&sources(&[&good, &bad]), &out, &options(40, 30), None).unwrap();

        assert_eq!(outcome.completed.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].source, bad);
        assert!(out.join("good-40w@4x3.jpg").exists());
    }

    #[test]
    fn second_run_hits_the_cache() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        create_test_jpeg(&a, 80, 40);
        let out = tmp.path().join("out");
        let opts = options(40, 30);
        let imgs = sources(&[&a]);

        let first = process(&imgs, &out, &opts, None).unwrap();
        assert_eq!(first.cache_stats.misses, 1);

        let second = process(&imgs, &out, &opts, None).unwrap();
        assert_eq!(second.cache_stats.hits, 1);
        assert_eq!(second.cache_stats.misses, 0);
        assert!(second.completed[0].cached);
        assert!(second.completed[0].report.is_none());
    }

    #[test]
    fn parameter_change_invalidates_the_cache() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        create_test_jpeg(&a, 80, 40);
        let out = tmp.path().join("out");
        let imgs = sources(&[&a]);

        process(&imgs, &out, &options(40, 30), None).unwrap();

        let mut changed = options(40, 30);
        changed.crop.threshold = 80;
        let rerun = process(&imgs, &out, &changed, None).unwrap();
        assert_eq!(rerun.cache_stats.misses, 1);
    }

    #[test]
    fn source_change_invalidates_the_cache() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        create_test_jpeg(&a, 80, 40);
        let out = tmp.path().join("out");
        let opts = options(40, 30);
        let imgs = sources(&[&a]);

        process(&imgs, &out, &opts, None).unwrap();
        create_test_jpeg(&a, 82, 40);
        let rerun = process(&imgs, &out, &opts, None).unwrap();
        assert_eq!(rerun.cache_stats.misses, 1);
    }

    #[test]
    fn no_cache_reencodes_everything() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        create_test_jpeg(&a, 80, 40);
        let out = tmp.path().join("out");
        let mut opts = options(40, 30);
        let imgs = sources(&[&a]);

        process(&imgs, &out, &opts, None).unwrap();
        opts.use_cache = false;
        let rerun = process(&imgs, &out, &opts, None).unwrap();
        assert_eq!(rerun.cache_stats.misses, 1);
    }

    #[test]
    fn events_stream_per_image() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.jpg");
        create_test_jpeg(&a, 80, 40);
        let out = tmp.path().join("out");

        let (tx, rx) = mpsc::channel();
        process(&sources(&[&a]), &out, &options(40, 30), Some(tx)).unwrap();

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert!(matches!(&events[0], ProcessEvent::Started { name } if name == "a.jpg"));
        assert!(
            matches!(&events[1], ProcessEvent::Fitted { output, .. } if output == "a-40w@4x3.jpg")
        );
    }

    #[test]
    fn failed_event_carries_the_error() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("bad.jpg");
        std::fs::write(&bad, b"garbage").unwrap();
        let out = tmp.path().join("out");

        let (tx, rx) = mpsc::channel();
        process(&sources(&[&bad]), &out, &options(40, 30), Some(tx)).unwrap();

        let events: Vec<ProcessEvent> = rx.iter().collect();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, ProcessEvent::Failed { name, .. } if name == "bad.jpg"))
        );
    }
}
