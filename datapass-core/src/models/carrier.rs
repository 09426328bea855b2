//! Carrier types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Carrier text meaning the user still has to pick a line (multi-SIM devices).
pub const CARRIER_NOT_SELECTED: &str = "CARRIER_NOT_SELECTED";

/// Carrier families whose usage is published on the datapass page.
///
/// Both families share one page layout; they differ only in whether the
/// page is expected to carry the primary provider's identity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierFamily {
    /// Telekom Deutschland (T-Mobile family).
    Telekom,
    /// congstar, a reseller on the Telekom network.
    Congstar,
}

impl CarrierFamily {
    /// All supported families in resolution priority order.
    pub const ALL: [CarrierFamily; 2] = [CarrierFamily::Telekom, CarrierFamily::Congstar];

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Telekom => "Telekom Deutschland",
            Self::Congstar => "congstar",
        }
    }

    /// Short lowercase name used on the command line.
    pub fn cli_name(self) -> &'static str {
        match self {
            Self::Telekom => "telekom",
            Self::Congstar => "congstar",
        }
    }

    /// Case-sensitive substring identifying this family in an operator name.
    pub fn operator_marker(self) -> &'static str {
        match self {
            Self::Telekom => "Telekom",
            Self::Congstar => "congstar",
        }
    }

    /// Whether a page for this family must carry the provider identity marker.
    pub fn expects_provider_marker(self) -> bool {
        matches!(self, Self::Telekom)
    }
}

impl fmt::Display for CarrierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CarrierFamily {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "telekom" | "t-mobile" | "tmobile" => Ok(Self::Telekom),
            "congstar" => Ok(Self::Congstar),
            _ => Err(CoreError::UnknownCarrier(s.to_string())),
        }
    }
}
