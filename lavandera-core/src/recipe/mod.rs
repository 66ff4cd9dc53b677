//! Recipe model, parser and validator
//!
//! Two text dialects are accepted and normalized into one [`Recipe`]:
//!
//! - **Sectioned**: three `[LAVADO]` / `[ENJUAGUE]` / `[CENTRIFUGADO]`
//!   sections of parameters, expanded into stages by fixed rules
//! - **Flat**: one `accion=...;duracion=...` record per stage
//!
//! Validation is strict: durations must be bare non-negative integers and
//! enumerated values must come from a known set. Every failure names the
//! field and the raw value.

mod error;
mod fields;
pub mod flat;
mod model;
pub mod sectioned;

use alloc::string::String;

pub use error::{ParseError, ParseErrorKind};
pub use fields::{DoseTable, FLAT_SPEEDS, SECTION_SPEEDS, WATER_TOKENS};
pub use flat::to_flat_text;
pub use model::{ChemicalId, Recipe, Speed, Stage, StageKind, WaterTemperature};

/// Recipe text dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dialect {
    Sectioned,
    Flat,
}

/// Detect which dialect `text` is written in
pub fn detect_dialect(text: &str) -> Dialect {
    if sectioned::looks_sectioned(text) {
        Dialect::Sectioned
    } else {
        Dialect::Flat
    }
}

/// Parse recipe text in either dialect
///
/// The recipe is named by its `NOMBRE=` / `nombre=` line, or left unnamed.
pub fn parse(text: &str) -> Result<Recipe, ParseError> {
    parse_named(text, "")
}

/// Parse recipe text, naming the recipe `fallback` when the text does not
///
/// Repositories pass the storage key here. Text with only blank lines and
/// comments is [`ParseErrorKind::EmptyInput`]; a recipe whose phases are all
/// zero parses to an empty stage list.
pub fn parse_named(text: &str, fallback: &str) -> Result<Recipe, ParseError> {
    if sectioned::significant_lines(text).next().is_none() {
        return Err(ParseError::new(ParseErrorKind::EmptyInput, "", ""));
    }

    let (name, stages) = match detect_dialect(text) {
        Dialect::Sectioned => {
            let params = sectioned::parse_params(text)?;
            let stages = sectioned::expand(&params);
            (params.name, stages)
        }
        Dialect::Flat => {
            let flat = flat::parse_flat(text)?;
            (flat.name, flat.stages)
        }
    };

    let name = name.unwrap_or_else(|| String::from(fallback.trim()));
    let recipe = Recipe::new(name, stages);
    debug!(
        "parsed recipe: {} stages, {} s total",
        recipe.len(),
        recipe.total_duration_s()
    );
    Ok(recipe)
}
