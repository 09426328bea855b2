//! Datapass page parser.
//!
//! Two layouts exist. The current one wraps both volumes in a single box
//! (`<div class="volume fit-text-to-container">12,3 MB von 5 GB</div>`); the
//! legacy one scatters them across the document. The current layout is tried
//! first and the legacy scan only runs when its marker is missing.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use datapass_core::{DataUnit, FetchOutcome, UsageReading, parse_locale_decimal};
use regex::Regex;
use tracing::debug;

use super::{CURRENT_LAYOUT_MARKER, PROVIDER_MARKER, VOLUME_USED_UP_MARKER};
use crate::error::ParseError;

// ============================================================================
// Patterns
// ============================================================================

/// Volume token inside the current layout box: `1.024,5 MB` or `1536 MB`.
///
/// The number must start on a word boundary so a run of digits is never
/// read from its middle.
static CURRENT_VOLUME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d{3})*(?:,\d{1,4})?)\s*(GB|MB|kB)").expect("Invalid regex")
});

/// Volume token anywhere in a legacy page; any single character separates
/// the number from its unit.
static LEGACY_VOLUME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d?\.?\d{1,3},?\d{0,4}).(GB|MB|kB)").expect("Invalid regex")
});

/// Carrier timestamp: `24.03.2024 um 13:37`.
static LAST_UPDATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2}\.\d{2}\.\d{4}.{4}\d{2}:\d{2})").expect("Invalid regex")
});

const LAST_UPDATE_FORMAT: &str = "%d.%m.%Y um %H:%M";

// ============================================================================
// Types
// ============================================================================

/// Which page layout the volumes were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Single volume box.
    Current,
    /// Volumes scattered through the document.
    Legacy,
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// What a parsable page says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// Used and available volume.
    Usage(UsageReading),
    /// The volume is used up; the page shows no numbers.
    Wasted,
}

impl From<PageContent> for FetchOutcome {
    fn from(content: PageContent) -> Self {
        match content {
            PageContent::Usage(reading) => FetchOutcome::Success(reading),
            PageContent::Wasted => FetchOutcome::Wasted,
        }
    }
}

/// Result of parsing one page.
pub type ParseResult = Result<PageContent, ParseError>;

/// A number with its unit, as printed on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VolumeToken {
    value: f64,
    unit: DataUnit,
}

impl VolumeToken {
    fn from_captures(number: &str, unit: &str) -> Result<Self, ParseError> {
        let value = parse_locale_decimal(number)
            .ok_or_else(|| ParseError::InvalidNumber(number.to_string()))?;
        let unit =
            DataUnit::from_symbol(unit).ok_or_else(|| ParseError::InvalidUnit(unit.to_string()))?;
        Ok(Self { value, unit })
    }

    fn bytes(self) -> u64 {
        self.unit.to_bytes(self.value)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parses a datapass page.
///
/// `expect_provider_marker` is true for the network operator's own customers
/// and false for resellers. A page whose imprint disagrees belongs to the
/// other family and is rejected.
///
/// The first volume token is the used volume, the second the available one.
/// A missing or unreadable timestamp does not fail the parse.
///
/// # Errors
///
/// Returns a [`ParseError`] when the imprint check fails or the volumes
/// cannot be read.
pub fn parse_datapass_page(html: &str, expect_provider_marker: bool) -> ParseResult {
    debug!(len = html.len(), expect_provider_marker, "Parsing datapass page");

    if html.contains(VOLUME_USED_UP_MARKER) {
        debug!("Volume used up marker found");
        return Ok(PageContent::Wasted);
    }

    let found = html.contains(PROVIDER_MARKER);
    if found != expect_provider_marker {
        return Err(ParseError::ProviderMismatch {
            expected: expect_provider_marker,
            found,
        });
    }

    let (layout, tokens) = match current_volume_slice(html) {
        Some(slice) => (PageLayout::Current, volume_tokens(&CURRENT_VOLUME_REGEX, slice)?),
        None => (PageLayout::Legacy, volume_tokens(&LEGACY_VOLUME_REGEX, html)?),
    };

    let [used, available] = tokens[..] else {
        return Err(ParseError::MissingTokens {
            layout,
            found: tokens.len(),
        });
    };

    let bytes_available = available.bytes();
    if bytes_available == 0 {
        return Err(ParseError::ZeroQuota);
    }

    let mut reading = UsageReading::new(used.bytes(), bytes_available);
    if let Some(last_update) = find_last_update(html) {
        reading = reading.with_last_update(last_update);
    }

    debug!(
        %layout,
        wasted = reading.bytes_wasted,
        available = reading.bytes_available,
        "Parsed datapass page"
    );
    Ok(PageContent::Usage(reading))
}

/// Returns the text between the current layout marker and the next `</div>`.
fn current_volume_slice(html: &str) -> Option<&str> {
    let start = html.find(CURRENT_LAYOUT_MARKER)? + CURRENT_LAYOUT_MARKER.len();
    let rest = &html[start..];
    let end = rest.find("</div>").unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Collects at most the first two volume tokens in document order.
fn volume_tokens(pattern: &Regex, text: &str) -> Result<Vec<VolumeToken>, ParseError> {
    pattern
        .captures_iter(text)
        .take(2)
        .map(|caps| VolumeToken::from_captures(&caps[1], &caps[2]))
        .collect()
}

/// Scans the whole document; the last readable timestamp wins.
fn find_last_update(html: &str) -> Option<NaiveDateTime> {
    LAST_UPDATE_REGEX
        .captures_iter(html)
        .filter_map(|caps| NaiveDateTime::parse_from_str(&caps[1], LAST_UPDATE_FORMAT).ok())
        .last()
}

// ============================================================================
// Tests
// ============================================================================
