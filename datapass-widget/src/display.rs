//! Host-facing seams: rendering, notifications, device state.
//!
//! The orchestrator never touches a UI toolkit. It pushes [`RenderFrame`]s to
//! a [`WidgetRenderer`], hands messages to a [`Notifier`], and reads
//! connectivity from a [`DeviceInfo`].

use async_trait::async_trait;
use datapass_core::NetworkKind;
use serde::Serialize;

use crate::policy::{DisplayResult, Message, Severity};

/// Proportion text while an update is running.
pub const LOADING_TEXT: &str = "Loading…";

// ============================================================================
// Render Frame
// ============================================================================

/// One complete widget state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFrame {
    /// Gauge fill, `0..=100`.
    pub percentage: u8,
    /// Unit symbol.
    pub unit: String,
    /// `"<used>/<available>"` or the loading text.
    pub proportion: String,
    /// Carrier timestamp text.
    pub last_update: String,
    /// Hint line.
    pub hint: String,
    /// Gauge color class.
    pub severity: Severity,
    /// Whether a tap starts a new update.
    pub enable_interaction: bool,
}

impl RenderFrame {
    /// Intermediate frame shown while the animation runs.
    pub fn loading(percentage: u8) -> Self {
        Self {
            percentage: percentage.min(100),
            unit: String::new(),
            proportion: LOADING_TEXT.to_string(),
            last_update: String::new(),
            hint: String::new(),
            severity: Severity::Neutral,
            enable_interaction: false,
        }
    }

    /// Whether this is an animation frame.
    pub fn is_loading(&self) -> bool {
        !self.enable_interaction
    }
}

impl From<&DisplayResult> for RenderFrame {
    fn from(result: &DisplayResult) -> Self {
        Self {
            percentage: result.percentage.min(100),
            unit: result.unit.clone(),
            proportion: result.proportion.clone(),
            last_update: result.last_update.clone(),
            hint: result.hint.clone(),
            severity: result.severity,
            enable_interaction: true,
        }
    }
}

// ============================================================================
// Host Traits
// ============================================================================

/// Draws widget instances.
#[async_trait]
pub trait WidgetRenderer: Send + Sync {
    /// Replaces the visible state of `instance_id`.
    async fn render(&self, instance_id: i32, frame: &RenderFrame);

    /// Asks the user to choose a carrier for `instance_id`.
    async fn request_carrier_selection(&self, instance_id: i32) {
        let _ = instance_id;
    }
}

/// Shows transient user notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Shows `message` for `instance_id`.
    async fn notify(&self, instance_id: i32, message: Message);
}

/// Reads the device's connectivity.
pub trait DeviceInfo: Send + Sync {
    /// Active network, `None` without any connection.
    fn network(&self) -> Option<NetworkKind>;

    /// Network operator name, empty when unknown.
    fn operator_name(&self) -> String;

    /// Number of active SIM cards.
    fn sim_count(&self) -> usize;

    /// Whether the device has more than one active SIM.
    fn is_multi_sim(&self) -> bool {
        self.sim_count() > 1
    }
}

/// Device state fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDevice {
    /// Reported network.
    pub network: Option<NetworkKind>,
    /// Reported operator name.
    pub operator_name: String,
    /// Reported SIM count.
    pub sim_count: usize,
}

impl StaticDevice {
    /// Single-SIM device on mobile data.
    pub fn mobile(operator_name: impl Into<String>) -> Self {
        Self {
            network: Some(NetworkKind::Mobile),
            operator_name: operator_name.into(),
            sim_count: 1,
        }
    }

    /// Replaces the network.
    #[must_use]
    pub fn with_network(mut self, network: Option<NetworkKind>) -> Self {
        self.network = network;
        self
    }

    /// Replaces the SIM count.
    #[must_use]
    pub fn with_sim_count(mut self, sim_count: usize) -> Self {
        self.sim_count = sim_count;
        self
    }
}

impl DeviceInfo for StaticDevice {
    fn network(&self) -> Option<NetworkKind> {
        self.network
    }

    fn operator_name(&self) -> String {
        self.operator_name.clone()
    }

    fn sim_count(&self) -> usize {
        self.sim_count
    }
}
