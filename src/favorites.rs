use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Storage port
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading favorites store: {0}")]
    Io(#[from] std::io::Error),
    #[error("decoding favorites store: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Persistence boundary for the favorites set.
///
/// Core logic never touches the filesystem directly; the store is injected
/// so tests (and future remote-profile backends) can swap it out.
pub trait FavoritesStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError>;
    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), StoreError>;
}

/// JSON-file-backed store: a flat array of dataset names.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        JsonFileStore { path }
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, favorites: &BTreeSet<String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(favorites)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Favorites context
// ---------------------------------------------------------------------------

/// The user's favorite datasets, keyed by display name.
///
/// Store failures degrade gracefully: a broken store means favorites start
/// empty and stop persisting, but toggling keeps working in-memory and the
/// browser never aborts.
pub struct Favorites {
    names: BTreeSet<String>,
    store: Box<dyn FavoritesStore>,
}

impl Favorites {
    /// Load favorites from the store, falling back to an empty set.
    pub fn load_or_default(store: Box<dyn FavoritesStore>) -> Self {
        let names = match store.load() {
            Ok(names) => names,
            Err(e) => {
                log::warn!("Failed to load favorites, starting empty: {e}");
                BTreeSet::new()
            }
        };
        Favorites { names, store }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Flip a dataset's favorite status and persist the new set.
    pub fn toggle(&mut self, name: &str) {
        if !self.names.remove(name) {
            self.names.insert(name.to_string());
        }
        if let Err(e) = self.store.save(&self.names) {
            log::error!("Failed to persist favorites: {e}");
        }
    }
}
