//! Processing cache for repeated runs.
//!
//! Lanczos resampling plus edge analysis makes re-fitting a large wallpaper
//! collection needlessly slow when most of it hasn't changed. This module
//! lets the processing stage skip images whose source bytes and fit
//! parameters both match a previous run.
//!
//! # Design
//!
//! The cache is **content-addressed**: a hit requires the SHA-256 of the
//! source file contents *and* the SHA-256 of the fit parameters to match
//! the recorded entry, and the previously-written output file to still
//! exist. Content hashing (rather than mtime) survives `git checkout` and
//! file copies, which reset timestamps.
//!
//! - **`source_hash`**: SHA-256 of the source file bytes.
//! - **`params_hash`**: SHA-256 of the fit parameters (target size,
//!   threshold, upscale and mask flags). Changing any of them re-encodes.
//!
//! Entries are keyed by output filename. Output names already encode the
//! target width and ratio, so a target change lands on a different key and
//! naturally misses.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.wallfit-cache.json`,
//! living alongside the generated wallpapers so it travels with them.
//!
//! ## Bypassing
//!
//! `--no-cache` loads an empty manifest, so every image is re-encoded and
//! the manifest is rebuilt from scratch.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".wallfit-cache.json";

/// Version of the manifest format. Bump to invalidate existing caches when
/// the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// A single cached output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub source_hash: String,
    pub params_hash: String,
}

/// On-disk manifest mapping output filenames to their cache entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, CacheEntry>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or a first run).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be used (corruption, version mismatch).
    pub fn load(output_dir: &Path) -> Self {
        let path = output_dir.join(MANIFEST_FILENAME);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(manifest) if manifest.version == MANIFEST_VERSION => manifest,
            _ => Self::empty(),
        }
    }

    /// Persist to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(output_dir.join(MANIFEST_FILENAME), json)
    }

    /// Whether `output_name` can be skipped: hashes match the recorded
    /// entry and the output file is still on disk.
    pub fn is_hit(
        &self,
        output_dir: &Path,
        output_name: &str,
        source_hash: &str,
        params_hash: &str,
    ) -> bool {
        self.entries.get(output_name).is_some_and(|entry| {
            entry.source_hash == source_hash
                && entry.params_hash == params_hash
                && output_dir.join(output_name).exists()
        })
    }

    /// Record (or overwrite) the entry for a freshly written output.
    pub fn insert(&mut self, output_name: &str, source_hash: String, params_hash: String) {
        self.entries.insert(
            output_name.to_string(),
            CacheEntry {
                source_hash,
                params_hash,
            },
        );
    }
}

/// Hit/miss counters for the end-of-run summary line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cached, {} encoded", self.hits, self.misses)
    }
}

/// SHA-256 of a file's contents, hex-encoded.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// SHA-256 of a stable parameter description, hex-encoded.
pub fn hash_params(description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(description.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_manifest_is_empty() {
        let tmp = TempDir::new().unwrap();
        let manifest = CacheManifest::load(tmp.path());
        assert!(manifest.entries.is_empty());
    }

    #[test]
    fn save_and_reload_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = CacheManifest::empty();
        manifest.insert("a-1920w@16x9.jpg", "s1".into(), "p1".into());
        manifest.save(tmp.path()).unwrap();

        let reloaded = CacheManifest::load(tmp.path());
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries["a-1920w@16x9.jpg"].source_hash, "s1");
    }

    #[test]
    fn corrupt_manifest_resets_to_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILENAME), "{not json").unwrap();
        assert!(CacheManifest::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn version_mismatch_resets_to_empty() {
        let tmp = TempDir::new().unwrap();
        let stale = r#"{"version": 0, "entries": {"x": {"source_hash": "a", "params_hash": "b"}}}"#;
        std::fs::write(tmp.path().join(MANIFEST_FILENAME), stale).unwrap();
        assert!(CacheManifest::load(tmp.path()).entries.is_empty());
    }

    #[test]
    fn hit_requires_hashes_and_output_file() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = CacheManifest::empty();
        manifest.insert("out.jpg", "s1".into(), "p1".into());

        // Output file missing: no hit even with matching hashes
        assert!(!manifest.is_hit(tmp.path(), "out.jpg", "s1", "p1"));

        std::fs::write(tmp.path().join("out.jpg"), "img").unwrap();
        assert!(manifest.is_hit(tmp.path(), "out.jpg", "s1", "p1"));

        // Either hash off: miss
        assert!(!manifest.is_hit(tmp.path(), "out.jpg", "s2", "p1"));
        assert!(!manifest.is_hit(tmp.path(), "out.jpg", "s1", "p2"));
        assert!(!manifest.is_hit(tmp.path(), "other.jpg", "s1", "p1"));
    }

    #[test]
    fn file_hash_tracks_content_not_name() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");
        std::fs::write(&a, "same").unwrap();
        std::fs::write(&b, "same").unwrap();
        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());

        std::fs::write(&b, "different").unwrap();
        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn params_hash_is_stable_and_distinguishing() {
        assert_eq!(hash_params("1920x1080:t166"), hash_params("1920x1080:t166"));
        assert_ne!(hash_params("1920x1080:t166"), hash_params("1920x1080:t80"));
    }
}
