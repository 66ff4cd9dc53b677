//! Hardware abstraction and integration traits
//!
//! These traits define the interface between the sequencer and everything
//! outside it: the washer hardware, the caller's UI, and recipe storage.

pub mod observer;
pub mod repository;
pub mod washer;

pub use observer::SequencerObserver;
pub use repository::{validate_name, RecipeRepository, RepositoryError};
pub use washer::{HardwareError, WasherIo, MAX_REPLY_LEN};
