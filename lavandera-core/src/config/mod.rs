//! Configuration types
//!
//! Board-agnostic machine configuration. The TOML loader lives in
//! `lavandera-drivers`; this module only defines the shape, the defaults and
//! the range checks.

pub mod types;

pub use types::*;
