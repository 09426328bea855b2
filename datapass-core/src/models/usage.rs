//! Usage-related types.
//!
//! - [`UsageReading`] - One successful parse of the carrier page
//! - [`FetchOutcome`] - Tagged result of one fetch attempt

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::units::DataUnit;

/// Output format for the carrier's last-update timestamp.
const LAST_UPDATE_FORMAT: &str = "%d.%m. - %H:%M";

// ============================================================================
// Usage Reading
// ============================================================================

/// Mobile data usage as reported by the carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReading {
    /// Bytes already used in the current period.
    pub bytes_wasted: u64,
    /// Bytes included in the current period.
    pub bytes_available: u64,
    /// When the carrier last refreshed the numbers. Lags behind by a few hours.
    pub last_update: Option<NaiveDateTime>,
}

impl UsageReading {
    /// Creates a reading without a carrier timestamp.
    pub fn new(bytes_wasted: u64, bytes_available: u64) -> Self {
        Self {
            bytes_wasted,
            bytes_available,
            last_update: None,
        }
    }

    /// Sets the carrier timestamp.
    #[must_use]
    pub fn with_last_update(mut self, last_update: NaiveDateTime) -> Self {
        self.last_update = Some(last_update);
        self
    }

    /// The display unit, derived from the available volume.
    pub fn unit(&self) -> DataUnit {
        DataUnit::dominant(self.bytes_available)
    }

    /// Used share of the volume, floored and clamped to `0..=100`.
    pub fn wasted_percentage(&self) -> u8 {
        if self.bytes_available == 0 {
            return if self.bytes_wasted == 0 { 0 } else { 100 };
        }
        let percent =
            u128::from(self.bytes_wasted) * 100 / u128::from(self.bytes_available);
        u8::try_from(percent.min(100)).unwrap_or(100)
    }

    /// Used volume rendered in [`Self::unit`].
    pub fn wasted_formatted(&self) -> String {
        self.unit().format(self.bytes_wasted)
    }

    /// Available volume rendered in [`Self::unit`].
    pub fn available_formatted(&self) -> String {
        self.unit().format(self.bytes_available)
    }

    /// `"<used>/<available>"`, e.g. `"0,1/5,0"`.
    pub fn proportion_text(&self) -> String {
        format!("{}/{}", self.wasted_formatted(), self.available_formatted())
    }

    /// Carrier timestamp as `dd.MM. - HH:mm`, empty when unknown.
    pub fn last_update_text(&self) -> String {
        self.last_update
            .map(|t| t.format(LAST_UPDATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The result of one fetch attempt. Exactly one variant per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Usage parsed successfully.
    Success(UsageReading),
    /// The data volume is used up completely.
    Wasted,
    /// Transport or parse failure.
    Error,
    /// The carrier is not supported.
    CarrierUnavailable,
    /// The user has not picked a carrier yet.
    CarrierNotSelected,
}

impl FetchOutcome {
    /// Returns true for [`FetchOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the reading of a successful fetch.
    pub fn reading(&self) -> Option<&UsageReading> {
        match self {
            Self::Success(reading) => Some(reading),
            _ => None,
        }
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Wasted => "wasted",
            Self::Error => "error",
            Self::CarrierUnavailable => "carrier_unavailable",
            Self::CarrierNotSelected => "carrier_not_selected",
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{GIB, MIB};
    use chrono::NaiveDate;

    #[test]
    fn test_percentage_floors() {
        let reading = UsageReading::new(DataUnit::MB.to_bytes(12.3), 5 * GIB);
        assert_eq!(reading.wasted_percentage(), 0);

        let reading = UsageReading::new(999, 1000);
        assert_eq!(reading.wasted_percentage(), 99);

        let reading = UsageReading::new(GIB, 2 * GIB);
        assert_eq!(reading.wasted_percentage(), 50);
    }

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(UsageReading::new(3 * GIB, GIB).wasted_percentage(), 100);
        assert_eq!(UsageReading::new(5, 0).wasted_percentage(), 100);
        assert_eq!(UsageReading::new(0, 0).wasted_percentage(), 0);
        assert_eq!(UsageReading::new(u64::MAX, 1).wasted_percentage(), 100);
    }

    #[test]
    fn test_unit_from_available() {
        let reading = UsageReading::new(300 * MIB, 5 * GIB);
        assert_eq!(reading.unit(), DataUnit::GB);
        assert_eq!(reading.proportion_text(), "0,3/5,0");

        let reading = UsageReading::new(100 * MIB, 500 * MIB);
        assert_eq!(reading.unit(), DataUnit::MB);
        assert_eq!(reading.proportion_text(), "100/500");
    }

    #[test]
    fn test_last_update_text() {
        let reading = UsageReading::new(0, GIB);
        assert_eq!(reading.last_update_text(), "");

        let ts = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let reading = reading.with_last_update(ts);
        assert_eq!(reading.last_update_text(), "07.03. - 09:05");
    }

    #[test]
    fn test_outcome_labels() {
        assert!(FetchOutcome::Success(UsageReading::new(0, 1)).is_success());
        assert!(!FetchOutcome::Wasted.is_success());
        assert_eq!(FetchOutcome::CarrierNotSelected.to_string(), "carrier_not_selected");
        assert!(FetchOutcome::Error.reading().is_none());
    }
}
