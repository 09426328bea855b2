//! Binary data units.
//!
//! Carrier pages report volumes as `GB`, `MB` or `kB` with German number
//! formatting (`1.024,5`). Everything is normalized to bytes with 1024-based
//! multipliers, and rendered back in the dominant unit with a comma as decimal
//! separator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Bytes per kilobyte.
pub const KIB: u64 = 1024;
/// Bytes per megabyte.
pub const MIB: u64 = 1024 * KIB;
/// Bytes per gigabyte.
pub const GIB: u64 = 1024 * MIB;

// ============================================================================
// Data Unit
// ============================================================================

/// A binary data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataUnit {
    /// Plain bytes.
    #[serde(rename = "bytes")]
    Bytes,
    /// Kilobytes (1024 bytes).
    #[serde(rename = "kB")]
    KB,
    /// Megabytes (1024 kB).
    #[serde(rename = "MB")]
    MB,
    /// Gigabytes (1024 MB).
    #[serde(rename = "GB")]
    GB,
}

impl DataUnit {
    /// Number of bytes in one of this unit.
    pub fn multiplier(self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::KB => KIB,
            Self::MB => MIB,
            Self::GB => GIB,
        }
    }

    /// Token used on the carrier page and in the UI.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::KB => "kB",
            Self::MB => "MB",
            Self::GB => "GB",
        }
    }

    /// Parses a unit token. Only the exact page tokens are accepted.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "bytes" => Some(Self::Bytes),
            "kB" => Some(Self::KB),
            "MB" => Some(Self::MB),
            "GB" => Some(Self::GB),
            _ => None,
        }
    }

    /// Digits after the decimal separator when formatting in this unit.
    pub fn decimals(self) -> usize {
        match self {
            Self::GB => 1,
            _ => 0,
        }
    }

    /// Returns the largest unit whose threshold `bytes` strictly exceeds.
    ///
    /// Exactly one gigabyte is therefore reported as `MB`.
    pub fn dominant(bytes: u64) -> Self {
        if bytes > GIB {
            Self::GB
        } else if bytes > MIB {
            Self::MB
        } else if bytes > KIB {
            Self::KB
        } else {
            Self::Bytes
        }
    }

    /// Converts a value in this unit to bytes, rounded to the nearest byte.
    ///
    /// Negative and non-finite values yield zero.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn to_bytes(self, value: f64) -> u64 {
        if !value.is_finite() || value <= 0.0 {
            return 0;
        }
        (value * self.multiplier() as f64).round() as u64
    }

    /// Renders `bytes` in this unit with a comma as decimal separator.
    #[allow(clippy::cast_precision_loss)]
    pub fn format(self, bytes: u64) -> String {
        let value = bytes as f64 / self.multiplier() as f64;
        format!("{:.*}", self.decimals(), value).replace('.', ",")
    }
}

impl fmt::Display for DataUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DataUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s.trim()).ok_or_else(|| CoreError::InvalidUnit(s.to_string()))
    }
}

// ============================================================================
// Locale Numbers
// ============================================================================

/// Parses a German-formatted decimal (`1.024,5` -> `1024.5`).
///
/// Dots are thousands separators and dropped, the comma becomes the decimal
/// point. Returns `None` for empty, negative or otherwise unreadable input.
pub fn parse_locale_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replace('.', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

// ============================================================================
// Tests
// ============================================================================
