//! Sectioned (three-phase) recipe dialect
//!
//! ```text
//! NOMBRE=Ciclo estandar
//!
//! [LAVADO]
//! LLENADO_S=120
//! DOSIFICAR=A:15,B:10
//! AGITAR_S=600
//! VEL=BAJA
//!
//! [ENJUAGUE]
//! REPETICIONES=2
//! LLENADO_S=100
//! AGITAR_S=300
//! VEL=BAJA
//!
//! [CENTRIFUGADO]
//! BALANCEO_S=60
//! CENTRIFUGADO_S=300
//! VEL=ALTA
//! ```
//!
//! The three phases expand into plain stages plus two fixed drain pulses:
//! 20 s after every rinse pass and 10 s right before the spin.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::error::{ParseError, ParseErrorKind};
use super::fields::{parse_dosing, parse_seconds, parse_speed, DoseTable, SECTION_SPEEDS};
use super::model::{Speed, Stage, StageKind, WaterTemperature};

/// Drain pulse run after every rinse pass (seconds)
pub const RINSE_DRAIN_S: u32 = 20;

/// Safety drain pulse run right before spinning (seconds)
pub const PRE_SPIN_DRAIN_S: u32 = 10;

/// Section names that must all be present
pub const REQUIRED_SECTIONS: [&str; 3] = ["LAVADO", "ENJUAGUE", "CENTRIFUGADO"];

/// Wash phase parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WashParams {
    pub fill_s: u32,
    pub dosing: DoseTable,
    pub agitate_s: u32,
    pub speed: Speed,
}

/// Rinse phase parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RinseParams {
    pub repetitions: u32,
    pub fill_s: u32,
    pub agitate_s: u32,
    pub speed: Speed,
}

/// Spin phase parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinParams {
    pub balance_s: u32,
    pub spin_s: u32,
    pub speed: Speed,
}

/// Fully validated three-phase cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleParams {
    pub name: Option<String>,
    pub wash: WashParams,
    pub rinse: RinseParams,
    pub spin: SpinParams,
}

/// Raw `KEY=value` pairs of one section, with their source line
type SectionMap = BTreeMap<String, (String, usize)>;

struct Section<'a> {
    name: &'static str,
    values: &'a SectionMap,
}

impl Section<'_> {
    fn path(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }

    fn raw(&self, key: &str) -> Option<(&str, usize)> {
        self.values.get(key).map(|(v, line)| (v.as_str(), *line))
    }

    fn seconds(&self, key: &str) -> Result<u32, ParseError> {
        match self.raw(key) {
            Some((raw, line)) => parse_seconds(raw, &self.path(key)).map_err(|e| e.at_line(line)),
            None => Ok(0),
        }
    }

    fn speed(&self, default: Speed) -> Result<Speed, ParseError> {
        match self.raw("VEL") {
            Some((raw, line)) => {
                parse_speed(raw, &self.path("VEL"), SECTION_SPEEDS).map_err(|e| e.at_line(line))
            }
            None => Ok(default),
        }
    }

    fn dosing(&self) -> Result<DoseTable, ParseError> {
        let (raw, line) = self.raw("DOSIFICAR").unwrap_or(("", 0));
        parse_dosing(raw, &self.path("DOSIFICAR")).map_err(|e| {
            if line > 0 {
                e.at_line(line)
            } else {
                e
            }
        })
    }
}

/// Check whether `text` is written in the sectioned dialect
///
/// True when the first significant line that is not a top-level
/// `NOMBRE=` assignment is a `[SECTION]` header.
pub fn looks_sectioned(text: &str) -> bool {
    significant_lines(text)
        .find(|(_, line)| !is_name_line(line))
        .is_some_and(|(_, line)| is_header(line))
}

/// Parse sectioned text into validated cycle parameters
///
/// A key repeated inside one section, or a second top-level `NOMBRE=`, is
/// [`ParseErrorKind::DuplicateKey`] with the line of the repeat.
pub fn parse_params(text: &str) -> Result<CycleParams, ParseError> {
    let mut name: Option<String> = None;
    let mut sections: BTreeMap<String, SectionMap> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (line_no, line) in significant_lines(text) {
        if is_header(line) {
            let section = line[1..line.len() - 1].trim().to_ascii_uppercase();
            sections.entry(section.clone()).or_default();
            current = Some(section);
            continue;
        }

        // Lines without an assignment are tolerated as free-form notes
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim().to_string();

        match &current {
            Some(section) => {
                let values = sections.entry(section.clone()).or_default();
                if values.contains_key(&key) {
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateKey,
                        format!("{}.{}", section, key),
                        value,
                    )
                    .at_line(line_no));
                }
                values.insert(key, (value, line_no));
            }
            None if key == "NOMBRE" => {
                if name.is_some() {
                    return Err(
                        ParseError::new(ParseErrorKind::DuplicateKey, "NOMBRE", value)
                            .at_line(line_no),
                    );
                }
                name = Some(value);
            }
            None => {}
        }
    }

    let missing: Vec<&'static str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|s| !sections.contains_key(*s))
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MissingSection { missing },
            "",
            "",
        ));
    }

    let lavado = section(&sections, "LAVADO");
    let wash = WashParams {
        fill_s: lavado.seconds("LLENADO_S")?,
        dosing: lavado.dosing()?,
        agitate_s: lavado.seconds("AGITAR_S")?,
        speed: lavado.speed(Speed::Low)?,
    };

    let enjuague = section(&sections, "ENJUAGUE");
    let rinse = RinseParams {
        repetitions: enjuague.seconds("REPETICIONES")?,
        fill_s: enjuague.seconds("LLENADO_S")?,
        agitate_s: enjuague.seconds("AGITAR_S")?,
        speed: enjuague.speed(Speed::Low)?,
    };

    let centrifugado = section(&sections, "CENTRIFUGADO");
    let spin = SpinParams {
        balance_s: centrifugado.seconds("BALANCEO_S")?,
        spin_s: centrifugado.seconds("CENTRIFUGADO_S")?,
        speed: centrifugado.speed(Speed::High)?,
    };

    Ok(CycleParams {
        name: name.filter(|n| !n.is_empty()),
        wash,
        rinse,
        spin,
    })
}

/// Expand validated cycle parameters into the canonical stage sequence
///
/// Zero-length phases are skipped. The rinse drain pulse follows every
/// rinse pass; the pre-spin drain only precedes a non-zero spin.
pub fn expand(params: &CycleParams) -> Vec<Stage> {
    let mut stages = Vec::new();

    let wash = &params.wash;
    if wash.fill_s > 0 {
        stages.push(Stage::new(StageKind::Fill, "llenado", wash.fill_s).with_water(WaterTemperature::Cold));
    }
    for &(chemical, seconds) in wash.dosing.iter().filter(|(_, s)| *s > 0) {
        stages.push(Stage::new(StageKind::Dose, "dosificar", seconds).with_chemical(chemical));
    }
    if wash.agitate_s > 0 {
        stages.push(Stage::new(StageKind::Agitate, "agitar", wash.agitate_s).with_speed(wash.speed));
    }

    let rinse = &params.rinse;
    for _ in 0..rinse.repetitions {
        if rinse.fill_s > 0 {
            stages.push(
                Stage::new(StageKind::Fill, "enjuague", rinse.fill_s).with_water(WaterTemperature::Cold),
            );
        }
        if rinse.agitate_s > 0 {
            stages.push(Stage::new(StageKind::Agitate, "agitar", rinse.agitate_s).with_speed(rinse.speed));
        }
        stages.push(Stage::new(StageKind::Drain, "drenaje", RINSE_DRAIN_S));
    }

    let spin = &params.spin;
    if spin.balance_s > 0 {
        stages.push(Stage::new(StageKind::Agitate, "balanceo", spin.balance_s).with_speed(Speed::Low));
    }
    if spin.spin_s > 0 {
        stages.push(Stage::new(StageKind::Drain, "drenaje", PRE_SPIN_DRAIN_S));
        stages.push(Stage::new(StageKind::Spin, "centrifugado", spin.spin_s).with_speed(spin.speed));
    }

    stages
}

fn section<'a>(sections: &'a BTreeMap<String, SectionMap>, name: &'static str) -> Section<'a> {
    static EMPTY: SectionMap = BTreeMap::new();
    Section {
        name,
        values: sections.get(name).unwrap_or(&EMPTY),
    }
}

pub(crate) fn significant_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn is_header(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('[') && line.ends_with(']')
}

fn is_name_line(line: &str) -> bool {
    line.split_once('=')
        .is_some_and(|(key, _)| key.trim().eq_ignore_ascii_case("NOMBRE"))
}
