//! On-disk cache of raw career pages.
//!
//! ## Storage Layout
//!
//! ```text
//! <cache dir>/
//!   Player-1234.html        # one file per encoded tag
//!   Other%23Name-42.html
//! ```
//!
//! The file modification time is the only freshness signal. Entries are never
//! edited in place: a write lands in a temp file which is renamed over the old
//! entry, and expiry removes the file outright, so a concurrent reader sees
//! either the old document, the new one, or a miss.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::{Error, Result};

const ENTRY_EXTENSION: &str = "html";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// URL-safe cache key derived from a player tag.
///
/// The mapping is deterministic and injective, so the same tag always lands in
/// the same file and distinct tags never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Encode a player tag into a key.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let encoded: String = form_urlencoded::byte_serialize(tag.as_bytes()).collect();
        // `*` survives form encoding but is not a valid file name character everywhere.
        Self(encoded.replace('*', "%2A"))
    }

    /// Recover a key from an entry file name such as `Player-1234.html`.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(&format!(".{ENTRY_EXTENSION}"))?;
        if stem.is_empty() {
            return None;
        }
        Some(Self(stem.to_string()))
    }

    /// The encoded key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the key back into the original tag.
    #[must_use]
    pub fn tag(&self) -> String {
        form_urlencoded::parse(format!("k={}", self.0).as_bytes())
            .next()
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }

    fn file_name(&self) -> String {
        format!("{}.{ENTRY_EXTENSION}", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored document and the time it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Key the entry is stored under
    pub key: CacheKey,
    /// Raw document as fetched
    pub content: String,
    /// Modification time of the entry file
    pub stored_at: SystemTime,
}

impl CacheEntry {
    /// Base64 `SHA256` of the content, used to identify a document revision in logs.
    #[must_use]
    pub fn digest(&self) -> String {
        content_digest(&self.content)
    }

    /// Age of the entry relative to `now`; zero if the clock went backwards.
    #[must_use]
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.stored_at).unwrap_or_default()
    }
}

/// Listing information for an entry, without its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry key
    pub key: CacheKey,
    /// Path of the entry file
    pub path: PathBuf,
    /// Modification time of the entry file
    pub stored_at: SystemTime,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Local filesystem store for cached career pages.
///
/// The directory is created lazily: constructing a store touches nothing, and
/// the first write provisions the directory if it is missing.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `root`. The directory need not exist yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry file for `key`.
    #[must_use]
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Create the storage directory if it does not exist. Idempotent.
    pub fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }
        warn!("Cache directory {} does not exist, creating", self.root.display());
        fs::create_dir_all(&self.root)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;
        info!("Cache directory {} created", self.root.display());
        Ok(())
    }

    /// Read the entry for `key`. A missing entry is `Ok(None)`.
    pub fn read(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read cache entry {}: {e}",
                    path.display()
                )));
            },
        };
        // The entry may have been swept between the read and the stat.
        let stored_at = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(e) if e.kind() == ErrorKind::NotFound => SystemTime::now(),
            Err(e) => return Err(Error::Io(e)),
        };

        Ok(Some(CacheEntry {
            key: key.clone(),
            content,
            stored_at,
        }))
    }

    /// Replace the entry for `key` with `content`.
    ///
    /// If the storage directory is missing, or something other than a
    /// directory sits at its path, it is provisioned and the write retried
    /// once before the failure is surfaced.
    pub fn write(&self, key: &CacheKey, content: &str) -> Result<CacheEntry> {
        let path = self.entry_path(key);
        match Self::write_atomic(&path, content) {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::NotFound || !self.root.is_dir() => {
                self.ensure_root()?;
                Self::write_atomic(&path, content).map_err(|e| {
                    Error::Storage(format!("Failed to write cache entry {}: {e}", path.display()))
                })?;
            },
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to write cache entry {}: {e}",
                    path.display()
                )));
            },
        }

        let stored_at = fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());
        debug!("Saved cache entry {} ({} bytes)", key, content.len());

        Ok(CacheEntry {
            key: key.clone(),
            content: content.to_string(),
            stored_at,
        })
    }

    fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
        let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_path = path.with_extension(format!(
            "{ENTRY_EXTENSION}.{}-{seq}.tmp",
            std::process::id()
        ));
        fs::write(&tmp_path, content)?;

        #[cfg(target_os = "windows")]
        if path.exists() {
            let _ = fs::remove_file(path);
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        Ok(())
    }

    /// Enumerate all entries. A store whose directory does not exist is empty.
    pub fn entries(&self) -> Result<Vec<EntryInfo>> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut entries = Vec::new();
        for item in dir {
            let item = item?;
            let Some(key) = item.file_name().to_str().and_then(CacheKey::from_file_name) else {
                continue;
            };
            let metadata = match item.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::Io(e)),
            };
            entries.push(EntryInfo {
                key,
                path: item.path(),
                stored_at: metadata.modified()?,
                size_bytes: metadata.len(),
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Remove the entry for `key` if `now - stored_at > ttl`.
    ///
    /// Returns `true` when a file was removed. An entry aged exactly `ttl` is
    /// kept, and an entry that is already gone is not an error.
    ///
    /// The entry is first renamed aside and its age checked again on the
    /// renamed file. A refresh that replaced it after the first check is put
    /// back, unless a newer write has already taken its place.
    pub fn remove_if_expired(
        &self,
        key: &CacheKey,
        now: SystemTime,
        ttl: Duration,
    ) -> Result<bool> {
        let path = self.entry_path(key);
        let is_expired =
            |stored_at: SystemTime| now.duration_since(stored_at).unwrap_or_default() > ttl;

        let stored_at = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::Io(e)),
        };
        if !is_expired(stored_at) {
            return Ok(false);
        }

        let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let aside = path.with_extension(format!(
            "{ENTRY_EXTENSION}.{}-{seq}.expired",
            std::process::id()
        ));
        match fs::rename(&path, &aside) {
            Ok(()) => {},
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to remove cache entry {}: {e}",
                    path.display()
                )));
            },
        }

        let taken_at = fs::metadata(&aside)
            .and_then(|m| m.modified())
            .unwrap_or(stored_at);
        if !is_expired(taken_at) {
            debug!("Cache entry {} was refreshed during sweep, restoring", key);
            match fs::hard_link(&aside, &path) {
                Err(e) if e.kind() != ErrorKind::AlreadyExists => {
                    warn!("Failed to restore cache entry {}: {}", key, e);
                },
                _ => {},
            }
            let _ = fs::remove_file(&aside);
            return Ok(false);
        }

        fs::remove_file(&aside).map_err(|e| {
            Error::Storage(format!("Failed to remove cache entry {}: {e}", path.display()))
        })?;
        let age = now.duration_since(taken_at).unwrap_or_default();
        debug!("Removed expired cache entry {} (age {}s)", key, age.as_secs());
        Ok(true)
    }
}

fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    STANDARD.encode(hasher.finalize())
}
