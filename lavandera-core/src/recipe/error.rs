//! Structured recipe validation errors

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// What went wrong with a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Not a bare decimal integer (unit suffixes like `10s` included)
    InvalidInteger,
    /// Integer below zero
    NegativeValue,
    /// Token outside the accepted set
    InvalidEnum {
        /// Accepted tokens, as they should be written
        valid: &'static [&'static str],
    },
    /// Chemical identifier not among the dosing channels
    UnknownChemicalId,
    /// Same key given twice where only one is allowed
    DuplicateKey,
    /// Required field absent and no default exists
    MissingField,
    /// Required sections absent from a sectioned recipe
    MissingSection {
        /// Every missing section name
        missing: Vec<&'static str>,
    },
    /// Entry does not have the expected shape (e.g. `A15` instead of `A:15`)
    MalformedEntry,
    /// Text contains no recipe lines at all
    EmptyInput,
}

/// Recipe validation failure
///
/// Carries the field path and the raw offending value so callers can
/// point the operator at the exact spot to fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ParseError {
    /// Failure category
    pub kind: ParseErrorKind,
    /// Field path, e.g. `LAVADO.LLENADO_S` or `step[2].duracion`
    pub field: String,
    /// Raw text that was rejected (empty when the field was missing)
    pub raw: String,
    /// 1-based source line, when the failure is tied to one
    pub line: Option<usize>,
}

impl ParseError {
    /// Create an error for `field` with the offending `raw` text
    pub fn new(kind: ParseErrorKind, field: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            raw: raw.into(),
            line: None,
        }
    }

    /// Attach the source line number (keeps an existing one)
    pub fn at_line(mut self, line: usize) -> Self {
        self.line.get_or_insert(line);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        match &self.kind {
            ParseErrorKind::InvalidInteger => write!(
                f,
                "{}: expected a bare whole number without units, got '{}'",
                self.field, self.raw
            ),
            ParseErrorKind::NegativeValue => {
                write!(f, "{}: must not be negative, got '{}'", self.field, self.raw)
            }
            ParseErrorKind::InvalidEnum { valid } => write!(
                f,
                "{}: invalid value '{}', use one of {{{}}}",
                self.field,
                self.raw,
                valid.join(",")
            ),
            ParseErrorKind::UnknownChemicalId => write!(
                f,
                "{}: unknown chemical '{}', use one of {{A,B,C,D}}",
                self.field, self.raw
            ),
            ParseErrorKind::DuplicateKey => {
                write!(f, "{}: '{}' given more than once", self.field, self.raw)
            }
            ParseErrorKind::MissingField => write!(f, "{}: required field is missing", self.field),
            ParseErrorKind::MissingSection { missing } => {
                write!(f, "missing sections: ")?;
                for (i, name) in missing.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[{}]", name)?;
                }
                Ok(())
            }
            ParseErrorKind::MalformedEntry => {
                write!(f, "{}: malformed entry '{}'", self.field, self.raw)
            }
            ParseErrorKind::EmptyInput => write!(f, "recipe text is empty"),
        }
    }
}
