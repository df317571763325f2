//! Document stores
//!
//! The [`Uploader`] trait is the seam to the object store that holds
//! supplier documents. Two stores ship with the crate: [`DirectoryStore`]
//! writes objects beneath a local directory and [`MemoryStore`] keeps them in
//! memory for dry runs.

use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use crate::error::StoreError;
use crate::file::UploadedFile;

/// Persists uploaded documents
pub trait Uploader: Send + Sync {
    /// Store the upload under `path` and return the stored key
    ///
    /// The upload is read from its start regardless of its current position.
    fn save(&self, path: &str, file: &mut UploadedFile) -> Result<String, StoreError>;
}

/// Prefix used when moving an existing object out of the way
pub fn default_move_prefix() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn normalize_key(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Stores documents as files beneath a root directory
///
/// Saving over an existing object first copies the old one to
/// `{prefix}-{name}` in the same directory, so earlier versions survive.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    move_prefix: Option<String>,
}

impl DirectoryStore {
    /// Create a store rooted at `root`; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            move_prefix: None,
        }
    }

    /// Use a fixed prefix when moving existing objects aside
    pub fn with_move_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.move_prefix = Some(prefix.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a stored key
    ///
    /// Keys with `..` components are refused so objects stay under the root.
    pub fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let key = normalize_key(key);
        if Path::new(key)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StoreError::Other(format!(
                "Object key escapes the store root: {}",
                key
            )));
        }
        Ok(self.root.join(key))
    }

    fn move_existing(&self, existing: &Path) -> io::Result<()> {
        if !existing.exists() {
            return Ok(());
        }

        let prefix = self
            .move_prefix
            .clone()
            .unwrap_or_else(default_move_prefix);
        let name = existing
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let moved = existing.with_file_name(format!("{}-{}", prefix, name));

        tracing::debug!(
            from = %existing.display(),
            to = %moved.display(),
            "Keeping previous version of document"
        );
        fs::copy(existing, moved).map(|_| ())
    }
}

impl Uploader for DirectoryStore {
    fn save(&self, path: &str, file: &mut UploadedFile) -> Result<String, StoreError> {
        let key = normalize_key(path).to_string();
        if key.is_empty() {
            return Err(StoreError::Other("Empty object key".to_string()));
        }

        let destination = self.object_path(&key)?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        self.move_existing(&destination)?;

        file.rewind()?;
        let mut output = fs::File::create(&destination)?;
        let written = io::copy(&mut *file, &mut output)?;
        file.rewind()?;

        tracing::info!(key = %key, bytes = written, "Stored document");
        Ok(key)
    }
}

/// Keeps stored documents in memory
///
/// A store built with [`MemoryStore::rejecting`] refuses every write with the
/// given response, which is how store outages are simulated.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    rejection: Option<(u16, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write
    pub fn rejecting(status: u16, reason: impl Into<String>) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            rejection: Some((status, reason.into())),
        }
    }

    /// Contents stored under a key
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|e| StoreError::Other(format!("Failed to acquire lock: {}", e)))?;
        Ok(objects.get(normalize_key(key)).cloned())
    }

    /// Keys of all stored objects, sorted
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|e| StoreError::Other(format!("Failed to acquire lock: {}", e)))?;
        Ok(objects.keys().cloned().collect())
    }
}

impl Uploader for MemoryStore {
    fn save(&self, path: &str, file: &mut UploadedFile) -> Result<String, StoreError> {
        if let Some((status, reason)) = &self.rejection {
            return Err(StoreError::response(*status, reason.clone()));
        }

        let key = normalize_key(path).to_string();
        let mut contents = Vec::new();
        file.rewind()?;
        file.read_to_end(&mut contents)?;
        file.rewind()?;

        let mut objects = self
            .objects
            .write()
            .map_err(|e| StoreError::Other(format!("Failed to acquire lock: {}", e)))?;
        objects.insert(key.clone(), contents);

        tracing::debug!(key = %key, "Stored document in memory");
        Ok(key)
    }
}
