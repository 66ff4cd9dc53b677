//! Board-agnostic core logic for the washer sequencer
//!
//! This crate contains all application logic that does not depend on
//! a specific machine or transport:
//!
//! - Recipe model, parser and validator (sectioned and flat dialects)
//! - Run-state machine and safety monitor
//! - Tick-driven sequencer, the blocking batch runner and the common
//!   whole-recipe runner interface
//! - Hardware abstraction, observer and repository traits
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod recipe;
pub mod safety;
pub mod sequencer;
pub mod state;
pub mod traits;

pub use recipe::{parse, parse_named, ParseError, ParseErrorKind, Recipe, Stage, StageKind};
pub use sequencer::{BatchOutcome, BatchRunner, CycleRunner, CycleStrategy, Sequencer, TickedRunner};
pub use state::RunState;
