//! Field rules shared by both recipe dialects

use alloc::format;

use super::error::{ParseError, ParseErrorKind};
use super::model::{ChemicalId, Speed, WaterTemperature};

/// Speed tokens accepted by the sectioned dialect
pub const SECTION_SPEEDS: &[&str] = &["BAJA", "MEDIA", "ALTA"];

/// Speed tokens accepted by the flat dialect
pub const FLAT_SPEEDS: &[&str] = &["bajo", "medio", "alto"];

/// Water tokens accepted by the flat dialect
pub const WATER_TOKENS: &[&str] = &["fria", "caliente"];

/// Dosing amounts for every channel, in seconds
pub type DoseTable = [(ChemicalId, u32); 4];

/// Parse a non-negative whole number of seconds
///
/// Only bare decimal digits (optionally preceded by `-`, which is then
/// rejected as negative) are accepted. `10s`, `+5` and `1.5` are invalid.
pub fn parse_seconds(raw: &str, field: &str) -> Result<u32, ParseError> {
    let value = raw.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::new(ParseErrorKind::InvalidInteger, field, value));
    }
    if negative {
        if digits.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ParseError::new(ParseErrorKind::NegativeValue, field, value));
    }

    digits
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::InvalidInteger, field, value))
}

/// Parse a speed token against a dialect's accepted set
///
/// Matching is case-insensitive. Both the masculine (`bajo`) and feminine
/// (`baja`) spellings name the same speed; the error lists `valid`.
pub fn parse_speed(
    raw: &str,
    field: &str,
    valid: &'static [&'static str],
) -> Result<Speed, ParseError> {
    let value = raw.trim();
    let is = |a: &str, b: &str| value.eq_ignore_ascii_case(a) || value.eq_ignore_ascii_case(b);

    if is("baja", "bajo") {
        Ok(Speed::Low)
    } else if is("media", "medio") {
        Ok(Speed::Medium)
    } else if is("alta", "alto") {
        Ok(Speed::High)
    } else {
        Err(ParseError::new(
            ParseErrorKind::InvalidEnum { valid },
            field,
            value,
        ))
    }
}

/// Parse an inlet water token
pub fn parse_water(raw: &str, field: &str) -> Result<WaterTemperature, ParseError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("fria") || value.eq_ignore_ascii_case("fría") {
        Ok(WaterTemperature::Cold)
    } else if value.eq_ignore_ascii_case("caliente") {
        Ok(WaterTemperature::Hot)
    } else {
        Err(ParseError::new(
            ParseErrorKind::InvalidEnum {
                valid: WATER_TOKENS,
            },
            field,
            value,
        ))
    }
}

/// Parse a chemical identifier
pub fn parse_chemical(raw: &str, field: &str) -> Result<ChemicalId, ParseError> {
    let value = raw.trim();
    ChemicalId::from_token(value)
        .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownChemicalId, field, value))
}

/// Parse a dosing field of the form `ID:seconds,ID:seconds,...`
///
/// Channels not mentioned dose for 0 seconds. Naming a channel twice is
/// rejected rather than silently keeping the last amount.
pub fn parse_dosing(raw: &str, field: &str) -> Result<DoseTable, ParseError> {
    let mut table: DoseTable = ChemicalId::ALL.map(|id| (id, 0));
    let mut seen = [false; 4];

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((id, seconds)) = entry.split_once(':') else {
            return Err(ParseError::new(ParseErrorKind::MalformedEntry, field, entry));
        };

        let id = parse_chemical(id, field)?;
        let slot = id as usize;
        if seen[slot] {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateKey,
                field,
                id.as_str(),
            ));
        }
        seen[slot] = true;

        let path = format!("{}.{}", field, id.as_str());
        table[slot].1 = parse_seconds(seconds, &path)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_accepts_bare_integers() {
        assert_eq!(parse_seconds("120", "x"), Ok(120));
        assert_eq!(parse_seconds(" 0 ", "x"), Ok(0));
        assert_eq!(parse_seconds("-0", "x"), Ok(0));
    }

    #[test]
    fn test_seconds_rejects_unit_suffix() {
        let err = parse_seconds("10s", "LAVADO.LLENADO_S").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
        assert_eq!(err.field, "LAVADO.LLENADO_S");
        assert_eq!(err.raw, "10s");
    }

    #[test]
    fn test_seconds_rejects_other_garbage() {
        for raw in ["", "abc", "+5", "1.5", "99999999999", "1 0"] {
            let err = parse_seconds(raw, "x").unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidInteger, "input {:?}", raw);
        }
    }

    #[test]
    fn test_seconds_rejects_negative() {
        let err = parse_seconds("-5", "x").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NegativeValue);
        assert_eq!(err.raw, "-5");
    }

    #[test]
    fn test_speed_case_normalized() {
        assert_eq!(parse_speed("baja", "v", SECTION_SPEEDS), Ok(Speed::Low));
        assert_eq!(parse_speed("Medio", "v", FLAT_SPEEDS), Ok(Speed::Medium));
        assert_eq!(parse_speed("ALTO", "v", FLAT_SPEEDS), Ok(Speed::High));
    }

    #[test]
    fn test_speed_error_names_valid_set() {
        let err = parse_speed("RAPIDO", "LAVADO.VEL", SECTION_SPEEDS).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::InvalidEnum {
                valid: &["BAJA", "MEDIA", "ALTA"]
            }
        );
    }

    #[test]
    fn test_water_tokens() {
        assert_eq!(parse_water("FRIA", "agua"), Ok(WaterTemperature::Cold));
        assert_eq!(parse_water("caliente", "agua"), Ok(WaterTemperature::Hot));
        assert!(parse_water("tibia", "agua").is_err());
    }

    #[test]
    fn test_dosing_defaults_missing_channels() {
        let table = parse_dosing("A:15,c:5", "DOSIFICAR").unwrap();
        assert_eq!(
            table,
            [
                (ChemicalId::A, 15),
                (ChemicalId::B, 0),
                (ChemicalId::C, 5),
                (ChemicalId::D, 0)
            ]
        );
        assert_eq!(parse_dosing("", "DOSIFICAR").unwrap()[0], (ChemicalId::A, 0));
    }

    #[test]
    fn test_dosing_rejects_unknown_channel() {
        let err = parse_dosing("A:1,E:2", "DOSIFICAR").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownChemicalId);
        assert_eq!(err.raw, "E");
    }

    #[test]
    fn test_dosing_rejects_duplicate_channel() {
        let err = parse_dosing("A:1,B:2,a:3", "DOSIFICAR").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateKey);
        assert_eq!(err.raw, "A");
    }

    #[test]
    fn test_dosing_amount_path() {
        let err = parse_dosing("B:10s", "LAVADO.DOSIFICAR").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
        assert_eq!(err.field, "LAVADO.DOSIFICAR.B");
    }

    #[test]
    fn test_dosing_malformed_entry() {
        let err = parse_dosing("A15", "DOSIFICAR").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedEntry);
    }
}
