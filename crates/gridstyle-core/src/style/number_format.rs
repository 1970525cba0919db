//! Number format handle
//!
//! Formats are carried opaquely; parsing and rendering them happens elsewhere.

use std::sync::Arc;

/// Format codes of the built-in formats the engine knows by number
const BUILTIN: [(u32, &str); 10] = [
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (14, "mm-dd-yy"),
    (20, "h:mm"),
    (49, "@"),
];

/// Number format of a cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    General,
    /// Built-in format by number
    BuiltIn(u32),
    /// Format code
    Custom(Arc<str>),
}

impl NumberFormat {
    /// A format from its code; built-in codes map to their number
    pub fn from_string<S: AsRef<str>>(format: S) -> Self {
        let format = format.as_ref();
        if format.eq_ignore_ascii_case("general") {
            return NumberFormat::General;
        }
        match BUILTIN.iter().find(|(_, code)| *code == format) {
            Some(&(id, _)) => NumberFormat::BuiltIn(id),
            None => NumberFormat::Custom(Arc::from(format)),
        }
    }

    /// A built-in format; unknown numbers fall back to general
    pub fn from_id(id: u32) -> Self {
        if BUILTIN.iter().any(|&(known, _)| known == id) {
            NumberFormat::BuiltIn(id)
        } else {
            NumberFormat::General
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General)
    }

    /// The format code
    pub fn format_string(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => BUILTIN
                .iter()
                .find(|&&(known, _)| known == *id)
                .map_or("General", |&(_, code)| code),
            NumberFormat::Custom(code) => code,
        }
    }
}
