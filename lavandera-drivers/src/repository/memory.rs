//! In-memory recipe repository
//!
//! Recipes are kept postcard-encoded, the same bytes a flash-backed store
//! would write, so a corrupt or foreign entry surfaces as a decode error
//! rather than being trusted.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use lavandera_core::recipe::Recipe;
use lavandera_core::traits::{validate_name, RecipeRepository, RepositoryError};

/// Recipe repository held in RAM
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: BTreeMap<String, Vec<u8>>,
    capacity: Option<usize>,
}

impl MemoryRepository {
    /// Create an unbounded repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding at most `capacity` recipes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw stored bytes for `name`
    pub fn raw(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Store raw bytes under `name`, bypassing encoding
    ///
    /// Used to restore a snapshot from persistent storage.
    pub fn insert_raw(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), RepositoryError> {
        validate_name(name)?;
        self.check_room(name)?;
        self.entries.insert(String::from(name), bytes);
        Ok(())
    }

    fn check_room(&self, name: &str) -> Result<(), RepositoryError> {
        match self.capacity {
            Some(capacity) if self.entries.len() >= capacity && !self.entries.contains_key(name) => {
                warn!("recipe storage full ({} entries)", capacity);
                Err(RepositoryError::Full)
            }
            _ => Ok(()),
        }
    }
}

impl RecipeRepository for MemoryRepository {
    fn list(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn load(&self, name: &str) -> Result<Recipe, RepositoryError> {
        let bytes = self
            .entries
            .get(name)
            .ok_or_else(|| RepositoryError::NotFound(String::from(name)))?;
        postcard::from_bytes(bytes).map_err(|_| {
            warn!("stored recipe failed to decode");
            RepositoryError::Decode
        })
    }

    fn save(&mut self, name: &str, recipe: &Recipe) -> Result<(), RepositoryError> {
        validate_name(name)?;
        self.check_room(name)?;
        let bytes = postcard::to_allocvec(recipe).map_err(|_| RepositoryError::Encode)?;
        debug!("saved recipe ({} bytes)", bytes.len());
        self.entries.insert(String::from(name), bytes);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), RepositoryError> {
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(String::from(name)))
    }
}
