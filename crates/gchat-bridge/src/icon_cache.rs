//! Content-addressed store for notification icons
//!
//! Toasts reference their image by file path, so every base64 icon sent by
//! the page is written once to `<cache_dir>/<sha256>.<ext>`. Identical
//! images always resolve to the same file. The cache lives in the per-run
//! temporary directory and is removed wholesale on exit.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use gchat_core::{ShellError, ShellResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub struct IconCache {
    /// Per-run temporary directory owning the cache
    root: PathBuf,
    /// Directory the icon files are written to
    dir: PathBuf,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    /// First-level lookup keyed by the original payload
    by_payload: HashMap<String, PathBuf>,
    writes: usize,
}

impl IconCache {
    /// Create a cache writing into `dir`, owned by the temporary directory `root`.
    ///
    /// Nothing touches the disk until the first icon is stored.
    pub fn new(root: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir: dir.into(),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a base64 image to a file path.
    ///
    /// Returns `None` when either input is empty or the image cannot be
    /// stored; failures are logged and never propagated.
    pub fn resolve(&self, base64: &str, mime_type: &str) -> Option<PathBuf> {
        if base64.is_empty() || mime_type.is_empty() {
            return None;
        }

        match self.store(base64, mime_type) {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Notification icon dropped: {}", e);
                None
            }
        }
    }

    fn store(&self, base64: &str, mime_type: &str) -> ShellResult<PathBuf> {
        // Held across the existence check and the write so one digest is
        // never written twice.
        let mut state = self.lock();

        if let Some(path) = state.by_payload.get(base64) {
            return Ok(path.clone());
        }

        let extension = mime_extension(mime_type).ok_or_else(|| {
            ShellError::icon_cache(format!("unsupported MIME type '{}'", mime_type))
        })?;
        let bytes = BASE64.decode(base64)?;
        let digest = hex_digest(&bytes);
        let path = self.dir.join(format!("{}.{}", digest, extension));

        if !path.exists() {
            fs::create_dir_all(&self.dir)?;
            fs::write(&path, &bytes)?;
            state.writes += 1;
            log::debug!("Cached notification icon {:?} ({} bytes)", path, bytes.len());
        }

        state.by_payload.insert(base64.to_string(), path.clone());
        Ok(path)
    }

    /// Number of icon files written by this cache
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Remove the temporary directory and everything in it.
    pub fn purge(&self) -> ShellResult<()> {
        let mut state = self.lock();
        state.by_payload.clear();
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
            log::info!("Removed temporary directory {:?}", self.root);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// File extension for an `image/<ext>` MIME type.
///
/// The extension is the run of word characters after `image/`, so
/// `image/svg+xml` maps to `svg`.
pub fn mime_extension(mime_type: &str) -> Option<String> {
    let lower = mime_type.trim().to_ascii_lowercase();
    let subtype = lower.strip_prefix("image/")?;
    let ext: String = subtype
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!ext.is_empty()).then_some(ext)
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn cache() -> (tempfile::TempDir, IconCache) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("run");
        let cache = IconCache::new(&root, root.join("iconCache"));
        (tmp, cache)
    }

    #[test]
    fn test_identical_payloads_share_one_file() {
        let (_tmp, cache) = cache();

        let first = cache.resolve(PNG, "image/png").unwrap();
        let second = cache.resolve(PNG, "image/png").unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.write_count(), 1);
        assert!(first.exists());
        assert_eq!(fs::read(&first).unwrap(), BASE64.decode(PNG).unwrap());
    }

    #[test]
    fn test_file_named_by_digest() {
        let (_tmp, cache) = cache();
        let path = cache.resolve(PNG, "image/png").unwrap();

        let expected = hex_digest(&BASE64.decode(PNG).unwrap());
        assert_eq!(expected.len(), 64);
        assert!(expected.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(path.file_name().unwrap().to_string_lossy(), format!("{}.png", expected));
        assert_eq!(path.parent().unwrap(), cache.dir());
    }

    #[test]
    fn test_existing_file_is_not_rewritten() {
        let (_tmp, first_cache) = cache();
        let path = first_cache.resolve(PNG, "image/png").unwrap();

        // A second cache over the same directory finds the file on disk
        let root = path.parent().unwrap().parent().unwrap().to_path_buf();
        let second_cache = IconCache::new(&root, root.join("iconCache"));
        assert_eq!(second_cache.resolve(PNG, "image/png").unwrap(), path);
        assert_eq!(second_cache.write_count(), 0);
    }

    #[test]
    fn test_empty_inputs_mean_no_icon() {
        let (_tmp, cache) = cache();
        assert_eq!(cache.resolve("", "image/png"), None);
        assert_eq!(cache.resolve(PNG, ""), None);
        assert!(!cache.dir().exists());
    }

    #[test]
    fn test_invalid_base64_is_not_fatal() {
        let (_tmp, cache) = cache();
        assert_eq!(cache.resolve("not base64!!", "image/png"), None);
        assert_eq!(cache.write_count(), 0);
    }

    #[test]
    fn test_non_image_mime_is_rejected() {
        let (_tmp, cache) = cache();
        assert_eq!(cache.resolve(PNG, "text/plain"), None);
    }

    #[test]
    fn test_mime_extension() {
        assert_eq!(mime_extension("image/png").as_deref(), Some("png"));
        assert_eq!(mime_extension("image/svg+xml").as_deref(), Some("svg"));
        assert_eq!(mime_extension("IMAGE/JPEG").as_deref(), Some("jpeg"));
        assert_eq!(mime_extension("image/"), None);
        assert_eq!(mime_extension("application/octet-stream"), None);
    }

    #[test]
    fn test_purge_removes_root() {
        let (_tmp, cache) = cache();
        let path = cache.resolve(PNG, "image/png").unwrap();
        assert!(path.exists());

        cache.purge().unwrap();
        assert!(!path.exists());
        assert!(!cache.dir().exists());

        // Purging twice is fine
        cache.purge().unwrap();
    }
}
