//! Page parsing errors.

use thiserror::Error;

use crate::datapass::PageLayout;

/// Why a datapass page could not be turned into a reading.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The provider imprint is present when it should be absent, or vice versa.
    #[error("Provider imprint mismatch: expected present={expected}, found present={found}")]
    ProviderMismatch {
        /// Whether the imprint was expected.
        expected: bool,
        /// Whether the imprint was found.
        found: bool,
    },

    /// Fewer than two volume tokens were found.
    #[error("Expected two volume tokens in {layout} layout, found {found}")]
    MissingTokens {
        /// Layout that was searched.
        layout: PageLayout,
        /// Number of tokens found.
        found: usize,
    },

    /// A volume number could not be read.
    #[error("Invalid volume number: {0}")]
    InvalidNumber(String),

    /// A volume unit is not one of the page units.
    #[error("Invalid volume unit: {0}")]
    InvalidUnit(String),

    /// The page reports no available volume at all.
    #[error("Page reports zero available volume")]
    ZeroQuota,
}
