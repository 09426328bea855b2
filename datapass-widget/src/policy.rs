//! Outcome to display policy.
//!
//! Maps a [`FetchOutcome`] plus the connectivity seen at update start to what
//! the widget shows, what gets cached, and which message a user-initiated
//! update would announce.
//!
//! | Outcome | Percentage | Severity | Cached | Message |
//! |---|---|---|---|---|
//! | Success | floor(used / available) | normal | yes | update succeeded |
//! | Wasted | 100 | warning | yes | volume used up |
//! | Error | last cached | neutral | no | depends on connectivity |
//! | `CarrierUnavailable` | 0 | neutral | no | carrier unsupported |
//! | `CarrierNotSelected` | 0 | neutral | no | depends on operator name |

use std::fmt;

use datapass_core::{FetchOutcome, NetworkKind};
use datapass_store::CachedUsage;
use serde::Serialize;

// ============================================================================
// Severity
// ============================================================================

/// Color class of the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fresh reading (blue).
    Normal,
    /// Volume used up (orange).
    Warning,
    /// Stale or no reading (dark gray).
    Neutral,
}

impl Severity {
    /// Gauge color as `#rrggbb`.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Normal => "#1e88e5",
            Self::Warning => "#fb8c00",
            Self::Neutral => "#424242",
        }
    }
}

// ============================================================================
// Messages & Hints
// ============================================================================

/// Notification shown after a user-initiated update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Fresh numbers were loaded.
    UpdateSucceeded,
    /// The data volume is used up.
    VolumeUsedUp,
    /// The update failed while on wifi.
    UpdateFailedWifi,
    /// The update failed on mobile data.
    UpdateFailedMobile,
    /// The update failed without any connection.
    UpdateFailedNoConnection,
    /// The carrier has no datapass page.
    CarrierUnsupported,
    /// The user has to pick a carrier first.
    CarrierNotSelected,
}

impl Message {
    /// User-facing text.
    pub fn text(self) -> &'static str {
        match self {
            Self::UpdateSucceeded => "Data usage updated",
            Self::VolumeUsedUp => "Your data volume is used up",
            Self::UpdateFailedWifi => "Update failed: the datapass page is only reachable over mobile data",
            Self::UpdateFailedMobile => "Update failed, please try again later",
            Self::UpdateFailedNoConnection => "Update failed: no connection",
            Self::CarrierUnsupported => "Your carrier is not supported",
            Self::CarrierNotSelected => "Please select the carrier for this widget",
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Hint line under the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Volume used up.
    VolumeUsedUp,
    /// Wifi is on; the page needs mobile data.
    TurnOffWifi,
    /// Mobile data is on but the update failed.
    UpdateFailed,
    /// No connection at all.
    TurnOnMobileData,
    /// Carrier has no datapass page (or no carrier at all).
    CarrierUnsupported,
    /// Multi-SIM device without a chosen carrier.
    CarrierNotSelected,
}

impl Hint {
    /// User-facing text.
    pub fn text(self) -> &'static str {
        match self {
            Self::VolumeUsedUp => "Volume used up",
            Self::TurnOffWifi => "Turn off wifi",
            Self::UpdateFailed => "Update failed",
            Self::TurnOnMobileData => "Turn on mobile data",
            Self::CarrierUnsupported => "Carrier not supported",
            Self::CarrierNotSelected => "Tap to select carrier",
        }
    }
}

// ============================================================================
// Display Result
// ============================================================================

/// Everything the final render and the notification need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
    /// Used share, `0..=100`.
    pub percentage: u8,
    /// Unit symbol, may be empty.
    pub unit: String,
    /// `"<used>/<available>"`, may be empty.
    pub proportion: String,
    /// Carrier timestamp text, may be empty.
    pub last_update: String,
    /// Hint text, may be empty.
    pub hint: String,
    /// Gauge color class.
    pub severity: Severity,
    /// Message for a user-initiated update.
    pub notification: Option<Message>,
    /// Whether the fields replace the cached ones.
    #[serde(skip)]
    pub persist: bool,
}

impl DisplayResult {
    /// The fields as they are cached.
    pub fn to_cached(&self) -> CachedUsage {
        CachedUsage {
            proportion: self.proportion.clone(),
            unit: self.unit.clone(),
            percentage: self.percentage,
            last_update: self.last_update.clone(),
            hint: self.hint.clone(),
        }
    }

    fn blank(percentage: u8, hint: Hint, severity: Severity, notification: Message) -> Self {
        Self {
            percentage,
            unit: String::new(),
            proportion: String::new(),
            last_update: String::new(),
            hint: hint.text().to_string(),
            severity,
            notification: Some(notification),
            persist: false,
        }
    }
}

/// Device state captured when the update started.
#[derive(Debug, Clone)]
pub struct PolicyInput<'a> {
    /// Active network, `None` without connection.
    pub network: Option<NetworkKind>,
    /// Operator name reported by the device, may be empty.
    pub operator_name: &'a str,
    /// Cached fields of the carrier.
    pub cached: &'a CachedUsage,
    /// Whether anything was ever cached for the carrier.
    pub has_cache: bool,
}

/// Applies the policy table.
pub fn display_for(outcome: &FetchOutcome, input: &PolicyInput<'_>) -> DisplayResult {
    match outcome {
        FetchOutcome::Success(reading) => DisplayResult {
            percentage: reading.wasted_percentage(),
            unit: reading.unit().symbol().to_string(),
            proportion: reading.proportion_text(),
            last_update: reading.last_update_text(),
            hint: String::new(),
            severity: Severity::Normal,
            notification: Some(Message::UpdateSucceeded),
            persist: true,
        },
        FetchOutcome::Wasted => DisplayResult {
            persist: true,
            ..DisplayResult::blank(100, Hint::VolumeUsedUp, Severity::Warning, Message::VolumeUsedUp)
        },
        FetchOutcome::Error => error_display(input),
        FetchOutcome::CarrierUnavailable => DisplayResult::blank(
            0,
            Hint::CarrierUnsupported,
            Severity::Neutral,
            Message::CarrierUnsupported,
        ),
        FetchOutcome::CarrierNotSelected => {
            if input.operator_name.is_empty() {
                DisplayResult::blank(
                    0,
                    Hint::CarrierUnsupported,
                    Severity::Neutral,
                    Message::UpdateFailedNoConnection,
                )
            } else {
                DisplayResult::blank(
                    0,
                    Hint::CarrierNotSelected,
                    Severity::Neutral,
                    Message::CarrierNotSelected,
                )
            }
        }
    }
}

/// Keeps the cached reading; only hint and message reflect the failure.
fn error_display(input: &PolicyInput<'_>) -> DisplayResult {
    let (message, hint) = match input.network {
        Some(NetworkKind::Wifi) => (Some(Message::UpdateFailedWifi), Some(Hint::TurnOffWifi)),
        Some(NetworkKind::Mobile) => (Some(Message::UpdateFailedMobile), Some(Hint::UpdateFailed)),
        Some(NetworkKind::Other) => (None, None),
        None => (
            Some(Message::UpdateFailedNoConnection),
            Some(Hint::TurnOnMobileData),
        ),
    };

    let cached = input.cached;
    let hint = match hint {
        Some(hint) if !input.has_cache => hint.text().to_string(),
        _ => cached.hint.clone(),
    };

    DisplayResult {
        percentage: cached.percentage.min(100),
        unit: cached.unit.clone(),
        proportion: cached.proportion.clone(),
        last_update: cached.last_update.clone(),
        hint,
        severity: Severity::Neutral,
        notification: message,
        persist: false,
    }
}

// ============================================================================
// Tests
// ============================================================================
