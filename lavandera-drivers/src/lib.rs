//! Washer adapters and host-side services
//!
//! This crate provides concrete implementations of the traits defined in
//! lavandera-core:
//!
//! - Washer adapters: simulated (records commands), transport-backed (relay
//!   controller over serial) and a GPIO interlock wrapper
//! - In-memory recipe repository with postcard-encoded entries
//! - TOML / postcard machine configuration loading

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod repository;
pub mod washer;

pub use config::{decode_config, encode_config, load_config, parse_config};
pub use repository::MemoryRepository;
pub use washer::{InterlockedWasher, IoCall, PinInterlocks, SimulatedWasher, TransportWasher};
