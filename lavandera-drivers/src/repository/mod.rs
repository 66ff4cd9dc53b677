//! Recipe storage
//!
//! Implementations of [`lavandera_core::traits::RecipeRepository`].

pub mod memory;

pub use memory::MemoryRepository;
