//! Byte order
//!
//! Governs how a value's bits map onto its byte range.

use std::fmt;
use std::str::FromStr;

use crate::error::CoopError;

/// Byte-order convention for a value laid out over a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endness {
    /// Lowest address holds the most significant byte
    Big,

    /// Lowest address holds the least significant byte
    Little,
}

impl Endness {
    /// Order used for values whose bytes are all identical (e.g. zero fill)
    pub const CANONICAL: Endness = Endness::Big;

    /// True for little-endian
    pub fn is_little(self) -> bool {
        self == Endness::Little
    }
}

impl fmt::Display for Endness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endness::Big => write!(f, "BE"),
            Endness::Little => write!(f, "LE"),
        }
    }
}

impl FromStr for Endness {
    type Err = CoopError;

    /// Accepts `be`/`big`/`Iend_BE` and `le`/`little`/`Iend_LE`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "be" | "big" | "iend_be" => Ok(Endness::Big),
            "le" | "little" | "iend_le" => Ok(Endness::Little),
            other => Err(CoopError::MalformedInput(format!(
                "Unknown endianness: {:?}",
                other
            ))),
        }
    }
}
