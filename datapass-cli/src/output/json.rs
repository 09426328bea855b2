//! JSON output formatting.

use anyhow::Result;
use datapass_carriers::CarrierDescriptor;
use datapass_core::FetchOutcome;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one fetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeOutput {
    pub carrier: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageOutput>,
}

/// Parsed usage numbers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOutput {
    pub bytes_wasted: u64,
    pub bytes_available: u64,
    pub wasted_percent: u8,
    pub unit: &'static str,
    pub proportion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

/// Carrier list entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierOutput {
    pub display_name: &'static str,
    pub cli_name: &'static str,
    pub operator_marker: &'static str,
    pub aliases: Vec<&'static str>,
    pub checks_imprint: bool,
    pub url: &'static str,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats one fetch outcome.
    pub fn format_outcome(&self, carrier: &str, outcome: &FetchOutcome) -> Result<String> {
        self.format(&outcome_to_output(carrier, outcome))
    }

    /// Formats the carrier list.
    pub fn format_carriers(&self, carriers: &[CarrierDescriptor]) -> Result<String> {
        let outputs: Vec<CarrierOutput> = carriers
            .iter()
            .map(|desc| CarrierOutput {
                display_name: desc.display_name,
                cli_name: desc.cli_name,
                operator_marker: desc.operator_marker,
                aliases: desc.aliases.to_vec(),
                checks_imprint: desc.expects_provider_marker,
                url: desc.url,
            })
            .collect();

        self.format(&outputs)
    }
}

fn outcome_to_output(carrier: &str, outcome: &FetchOutcome) -> OutcomeOutput {
    let usage = outcome.reading().map(|reading| {
        let updated = reading.last_update_text();
        UsageOutput {
            bytes_wasted: reading.bytes_wasted,
            bytes_available: reading.bytes_available,
            wasted_percent: reading.wasted_percentage(),
            unit: reading.unit().symbol(),
            proportion: reading.proportion_text(),
            last_update: (!updated.is_empty()).then_some(updated),
        }
    });

    OutcomeOutput {
        carrier: carrier.to_string(),
        outcome: outcome.label(),
        usage,
    }
}
