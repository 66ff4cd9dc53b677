//! Recipe storage abstraction

use alloc::string::String;
use alloc::vec::Vec;

use crate::recipe::{parse_named, ParseError, Recipe};

/// Errors raised by recipe repositories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No recipe stored under that name
    #[error("no recipe named '{0}'")]
    NotFound(String),
    /// Name is empty or contains a path separator or control character
    #[error("invalid recipe name '{0}'")]
    InvalidName(String),
    /// Recipe could not be encoded for storage
    #[error("failed to encode recipe")]
    Encode,
    /// Stored bytes could not be decoded
    #[error("stored recipe is corrupt")]
    Decode,
    /// Repository has no room for another recipe
    #[error("recipe storage is full")]
    Full,
    /// Imported text is not a valid recipe
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Check that `name` can be used as a storage key
pub fn validate_name(name: &str) -> Result<(), RepositoryError> {
    let bad = name.trim().is_empty()
        || name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        Err(RepositoryError::InvalidName(String::from(name)))
    } else {
        Ok(())
    }
}

/// Named recipe storage
pub trait RecipeRepository {
    /// Stored recipe names, sorted
    fn list(&self) -> Vec<String>;

    /// Load the recipe stored under `name`
    fn load(&self, name: &str) -> Result<Recipe, RepositoryError>;

    /// Store `recipe` under `name`, replacing any previous one
    fn save(&mut self, name: &str, recipe: &Recipe) -> Result<(), RepositoryError>;

    /// Remove the recipe stored under `name`
    fn delete(&mut self, name: &str) -> Result<(), RepositoryError>;

    /// Parse recipe text and store it under `name`
    ///
    /// Text that does not name the recipe is named after the storage key.
    fn import(&mut self, name: &str, text: &str) -> Result<Recipe, RepositoryError> {
        validate_name(name)?;
        let recipe = parse_named(text, name)?;
        self.save(name, &recipe)?;
        Ok(recipe)
    }
}
