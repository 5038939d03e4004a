//! Filesystem-backed binary cache.
//!
//! Compiled modules are stored as `<key>.wasm` files in a cache directory,
//! keyed by the SHA-256 of the source file's content concatenated with its
//! modification time - editing or touching the source changes the key, so
//! stale entries are simply never looked up again. A `metadata.json` maps
//! keys to created/expires timestamps; entries expire after seven days and
//! are pruned when the cache is opened.
//!
//! The cache's only contract with the compiler core is
//! `compile(source) -> bytes`. Lookups are idempotent: repeated calls with
//! the same unchanged source path return the same bytes without
//! recompiling.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

use crate::CompileError;

/// Cache entries expire after seven days.
const TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Name of the metadata file inside the cache directory.
const METADATA_FILE: &str = "metadata.json";

/// Error raised by cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Lifetime bookkeeping for one cached binary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CacheEntry {
    /// Unix timestamp when the entry was stored.
    created: u64,
    /// Unix timestamp after which the entry is stale.
    expires: u64,
}

/// A directory of compiled modules keyed on source content and mtime.
pub struct ModuleCache {
    cache_dir: PathBuf,
    metadata: FxHashMap<String, CacheEntry>,
}

impl ModuleCache {
    /// Open (or create) a cache directory and prune expired entries.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;

        let metadata = match fs::read(cache_dir.join(METADATA_FILE)) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("discarding unreadable cache metadata: {e}");
                FxHashMap::default()
            }),
            Err(_) => FxHashMap::default(),
        };

        let mut cache = Self {
            cache_dir,
            metadata,
        };
        cache.prune()?;
        Ok(cache)
    }

    /// Return the cached module for `source_path`, compiling and storing
    /// it on a miss.
    pub fn load_or_compile(&mut self, source_path: &Path) -> Result<Vec<u8>, CacheError> {
        let key = cache_key(source_path)?;

        if self.is_valid(&key) {
            match fs::read(self.binary_path(&key)) {
                Ok(bytes) => {
                    debug!(%key, "cache hit");
                    return Ok(bytes);
                },
                Err(_) => {
                    // Metadata without its binary; fall through and rebuild.
                    self.metadata.remove(&key);
                },
            }
        }

        debug!(%key, "cache miss, compiling");
        let source = fs::read_to_string(source_path)?;
        let wasm = crate::compile(&source)?;
        self.store(&key, &wasm)?;
        Ok(wasm)
    }

    /// Drop the cache entry for `source_path`, if any.
    pub fn invalidate(&mut self, source_path: &Path) -> Result<(), CacheError> {
        let key = cache_key(source_path)?;
        if self.metadata.remove(&key).is_some() {
            let _ = fs::remove_file(self.binary_path(&key));
            self.save_metadata()?;
        }
        Ok(())
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    fn is_valid(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .is_some_and(|entry| now() < entry.expires)
    }

    fn store(&mut self, key: &str, wasm: &[u8]) -> Result<(), CacheError> {
        fs::write(self.binary_path(key), wasm)?;
        let created = now();
        self.metadata.insert(
            key.to_owned(),
            CacheEntry {
                created,
                expires: created + TTL_SECS,
            },
        );
        self.save_metadata()
    }

    /// Remove expired entries and binaries nothing references.
    fn prune(&mut self) -> Result<(), CacheError> {
        let stale: Vec<String> = self
            .metadata
            .iter()
            .filter(|(_, entry)| now() >= entry.expires)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            self.metadata.remove(key);
            let _ = fs::remove_file(self.binary_path(key));
        }

        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "wasm") {
                let known = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| self.metadata.contains_key(stem));
                if !known {
                    let _ = fs::remove_file(&path);
                }
            }
        }

        if !stale.is_empty() {
            self.save_metadata()?;
        }
        Ok(())
    }

    fn save_metadata(&self) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(&self.metadata)?;
        fs::write(self.cache_dir.join(METADATA_FILE), bytes)?;
        Ok(())
    }

    fn binary_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.wasm"))
    }
}

/// SHA-256 of the source content followed by its mtime.
fn cache_key(source_path: &Path) -> Result<String, CacheError> {
    let content = fs::read(source_path)?;
    let mtime = fs::metadata(source_path)?
        .modified()?
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(&content);
    hasher.update(mtime.to_le_bytes());

    let digest = hasher.finalize();
    let mut key = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail.
        let _ = write!(key, "{byte:02x}");
    }
    Ok(key)
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
