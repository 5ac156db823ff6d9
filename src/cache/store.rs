//! Flat-file store for raw response payloads
//!
//! Provides a `CacheStore` that keeps one file per lookup key, holding the
//! exact bytes of the upstream response that produced it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use super::LookupKey;

/// Distinguishes temp files written concurrently by this process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reads and writes cached payloads under a root directory
///
/// Writes go through a temp file in the same directory followed by a rename,
/// so readers only ever see a missing file or a complete one. Two writers for
/// the same key resolve last-writer-wins.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache files are stored
    root: PathBuf,
}

impl CacheStore {
    /// Opens a store rooted at `root`, creating the directory if needed
    ///
    /// # Returns
    /// * `Ok(CacheStore)` once the directory exists
    /// * `Err` if the directory cannot be created
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self::with_dir(root.into());
        store.ensure_dir().await?;
        Ok(store)
    }

    /// Creates a store without touching the filesystem
    ///
    /// The directory is created lazily on the first `put`.
    pub fn with_dir(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the cache root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path to the cache file for the given key
    pub fn path_for(&self, key: &LookupKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Ensures the cache directory exists
    async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Reads the payload stored for a key
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` on a hit
    /// * `Ok(None)` if nothing is cached for the key
    /// * `Err` if the entry exists but cannot be read
    pub async fn get(&self, key: &LookupKey) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores the payload for a key, replacing any previous entry
    pub async fn put(&self, key: &LookupKey, bytes: &[u8]) -> io::Result<()> {
        self.ensure_dir().await?;

        let target = self.path_for(key);
        // Temp names must not grow with the key, or long keys exceed NAME_MAX
        let temp = self.root.join(format!(
            ".tmp.{}.{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&temp, bytes).await?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }
        Ok(())
    }
}
