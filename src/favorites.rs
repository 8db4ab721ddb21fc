use crate::api::{Drink, DrinkId};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FAVORITES_KEY: &str = "favorites";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt favorites data in {location}: {source}")]
    Corrupt {
        location: String,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whole-value key/value storage: every read returns the full value and every
/// write replaces it.
pub trait Storage: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Human readable location of a key, for error messages.
    fn describe(&self, key: &str) -> String;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let path = self.path_for(key);

        // Write beside the target and rename so readers never see half a file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err(&self.dir))?;
        tmp.write_all(value.as_bytes()).map_err(io_err(tmp.path()))?;
        tmp.persist(&path)
            .map_err(|e| io_err(&path)(e.error))?;
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

/// Favorite drinks, kept in insertion order and mirrored to storage.
pub struct FavoritesStore {
    storage: Box<dyn Storage>,
    entries: Vec<Drink>,
}

impl FavoritesStore {
    /// Read the persisted favorites. A missing key means no favorites; an
    /// unreadable value is an error.
    pub fn load(storage: Box<dyn Storage>) -> Result<Self, StoreError> {
        let entries = match storage.get_item(FAVORITES_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                location: storage.describe(FAVORITES_KEY),
                source,
            })?,
            None => Vec::new(),
        };
        tracing::info!(count = entries.len(), "favorites loaded");
        Ok(Self { storage, entries })
    }

    pub fn entries(&self) -> &[Drink] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &DrinkId) -> bool {
        self.entries.iter().any(|f| &f.id == id)
    }

    /// Remove the drink if present, append it otherwise, then rewrite the
    /// whole persisted list. The in-memory list is updated even if the write
    /// fails.
    pub fn toggle(&mut self, drink: &Drink) -> Result<Toggled, StoreError> {
        let toggled = if self.contains(&drink.id) {
            self.entries.retain(|f| f.id != drink.id);
            Toggled::Removed
        } else {
            self.entries.push(drink.clone());
            Toggled::Added
        };
        tracing::debug!(id = %drink.id, ?toggled, "favorite toggled");

        let raw = serde_json::to_string(&self.entries)?;
        self.storage.set_item(FAVORITES_KEY, &raw)?;
        Ok(toggled)
    }
}
