//! Flat (one stage per line) recipe dialect
//!
//! ```text
//! nombre=Ciclo Rapido
//! accion=prelavado;duracion=120;agua=fria
//! accion=lavado;duracion=600;quimico=A
//! accion=centrifugado;duracion=180;velocidad=alto
//! ```
//!
//! Also provides the serializer, which writes any recipe back out in this
//! dialect.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Write;

use super::error::{ParseError, ParseErrorKind};
use super::fields::{parse_chemical, parse_seconds, parse_speed, parse_water, FLAT_SPEEDS};
use super::model::{Recipe, Speed, Stage, StageKind, WaterTemperature};

/// Result of reading flat text, before the recipe is assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecipe {
    pub name: Option<String>,
    pub stages: Vec<Stage>,
}

/// Parse flat text
pub fn parse_flat(text: &str) -> Result<FlatRecipe, ParseError> {
    let mut name: Option<String> = None;
    let mut stages = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || !line.contains('=') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("nombre") && !value.contains(';') {
                if name.is_some() {
                    return Err(ParseError::new(ParseErrorKind::DuplicateKey, "nombre", value.trim())
                        .at_line(line_no));
                }
                name = Some(value.trim().to_string());
                continue;
            }
        }

        let stage = parse_record(line, stages.len()).map_err(|e| e.at_line(line_no))?;
        stages.push(stage);
    }

    Ok(FlatRecipe {
        name: name.filter(|n| !n.is_empty()),
        stages,
    })
}

/// Parse one `key=value;key=value` record into a stage
fn parse_record(line: &str, step: usize) -> Result<Stage, ParseError> {
    let mut action: Option<&str> = None;
    let mut duration: Option<&str> = None;
    let mut water: Option<&str> = None;
    let mut chemical: Option<&str> = None;
    let mut speed: Option<&str> = None;

    let path = |key: &str| format!("step[{}].{}", step, key);

    for pair in line.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        let slot = match key.as_str() {
            "accion" => &mut action,
            "duracion" => &mut duration,
            "agua" => &mut water,
            "quimico" => &mut chemical,
            "velocidad" => &mut speed,
            _ => {
                debug!("ignoring unknown key in step {}", step);
                continue;
            }
        };
        if slot.is_some() {
            return Err(ParseError::new(ParseErrorKind::DuplicateKey, path(&key), value));
        }
        *slot = Some(value);
    }

    let action = action
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingField, path("accion"), ""))?;
    let duration = duration.ok_or_else(|| ParseError::new(ParseErrorKind::MissingField, path("duracion"), ""))?;

    let kind = StageKind::from_action(action);
    let mut stage = Stage::new(kind, action, parse_seconds(duration, &path("duracion"))?);

    if let Some(raw) = water.filter(|w| !w.is_empty()) {
        stage.water = parse_water(raw, &path("agua"))?;
    }
    if let Some(raw) = chemical.filter(|c| !c.is_empty()) {
        stage.chemical = Some(parse_chemical(raw, &path("quimico"))?);
    }
    stage.speed = match speed.filter(|s| !s.is_empty()) {
        Some(raw) => parse_speed(raw, &path("velocidad"), FLAT_SPEEDS)?,
        None => kind.default_speed(),
    };

    if kind == StageKind::Dose && stage.chemical.is_none() {
        return Err(ParseError::new(ParseErrorKind::MissingField, path("quimico"), ""));
    }

    Ok(stage)
}

/// Write a recipe in the flat dialect
///
/// Optional fields are written only when they differ from what the parser
/// would fill in, so parsing the output again yields the same stages.
pub fn to_flat_text(recipe: &Recipe) -> String {
    let mut out = String::new();
    if !recipe.name().is_empty() {
        let _ = writeln!(out, "nombre={}", recipe.name());
    }

    for stage in recipe.stages() {
        let _ = write!(out, "accion={};duracion={}", stage.label, stage.duration_s);
        match stage.water {
            WaterTemperature::Cold => out.push_str(";agua=fria"),
            WaterTemperature::Hot => out.push_str(";agua=caliente"),
            WaterTemperature::None => {}
        }
        if let Some(chemical) = stage.chemical {
            let _ = write!(out, ";quimico={}", chemical.as_str());
        }
        if stage.speed != stage.kind.default_speed() {
            match stage.speed {
                Speed::Low => out.push_str(";velocidad=bajo"),
                Speed::Medium => out.push_str(";velocidad=medio"),
                Speed::High => out.push_str(";velocidad=alto"),
                Speed::None => {}
            }
        }
        out.push('\n');
    }

    out
}
