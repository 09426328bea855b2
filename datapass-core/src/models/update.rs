//! Update modes and connectivity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How much user-visible feedback an update produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// User-initiated: animation and notifications.
    #[default]
    Regular,
    /// Scheduled: animation, no notifications.
    Silent,
    /// Background connectivity change: no animation, no notifications.
    UltraSilent,
}

impl UpdateMode {
    /// Whether the loading animation runs while fetching.
    pub fn shows_animation(self) -> bool {
        !matches!(self, Self::UltraSilent)
    }

    /// Whether notification messages reach the user.
    pub fn shows_notifications(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Silent => "silent",
            Self::UltraSilent => "ultra-silent",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "regular" => Ok(Self::Regular),
            "silent" => Ok(Self::Silent),
            "ultra-silent" | "ultrasilent" => Ok(Self::UltraSilent),
            _ => Err(CoreError::InvalidMode(s.to_string())),
        }
    }
}

/// Type of the active network connection.
///
/// "No connection at all" is modelled as `Option::<NetworkKind>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    /// Wireless LAN. The datapass page is unreachable over wifi.
    Wifi,
    /// Cellular data.
    Mobile,
    /// Any other transport (ethernet, VPN, ...).
    Other,
}
