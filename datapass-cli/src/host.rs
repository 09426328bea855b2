//! Terminal stand-ins for the widget host.
//!
//! The CLI has no launcher to draw on. Frames go to the log, notifications to
//! stderr, and device state comes from command-line flags.

use async_trait::async_trait;
use clap::{Args, ValueEnum};
use datapass_core::NetworkKind;
use datapass_widget::{Message, Notifier, RenderFrame, StaticDevice, WidgetRenderer};
use tracing::{debug, info};

// ============================================================================
// Device Flags
// ============================================================================

/// Network type as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum NetworkArg {
    /// Mobile data.
    #[default]
    Mobile,
    /// Wireless LAN.
    Wifi,
    /// Any other transport.
    Other,
    /// No connection.
    None,
}

impl NetworkArg {
    /// The network kind, `None` without connection.
    pub fn kind(self) -> Option<NetworkKind> {
        match self {
            Self::Mobile => Some(NetworkKind::Mobile),
            Self::Wifi => Some(NetworkKind::Wifi),
            Self::Other => Some(NetworkKind::Other),
            Self::None => None,
        }
    }
}

/// Device state flags shared by the widget commands.
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Active network.
    #[arg(long, value_enum, default_value = "mobile")]
    pub network: NetworkArg,

    /// Network operator name as the phone reports it.
    #[arg(long, default_value = "")]
    pub operator: String,

    /// Number of active SIM cards.
    #[arg(long, default_value = "1")]
    pub sims: usize,
}

impl DeviceArgs {
    /// Builds the device the orchestrator reads from.
    pub fn device(&self) -> StaticDevice {
        StaticDevice {
            network: self.network.kind(),
            operator_name: self.operator.clone(),
            sim_count: self.sims,
        }
    }
}

// ============================================================================
// Renderer & Notifier
// ============================================================================

/// Logs frames instead of drawing them.
#[derive(Debug, Default)]
pub struct LogRenderer;

#[async_trait]
impl WidgetRenderer for LogRenderer {
    async fn render(&self, instance_id: i32, frame: &RenderFrame) {
        if frame.is_loading() {
            debug!(instance_id, percentage = frame.percentage, "Loading frame");
        } else {
            info!(
                instance_id,
                percentage = frame.percentage,
                proportion = %frame.proportion,
                unit = %frame.unit,
                hint = %frame.hint,
                "Widget rendered"
            );
        }
    }

    async fn request_carrier_selection(&self, instance_id: i32) {
        eprintln!(
            "Widget {instance_id} has no carrier. Choose one with: datapass widgets add {instance_id} --carrier <name>"
        );
    }
}

/// Prints notifications to stderr.
#[derive(Debug, Default)]
pub struct StderrNotifier {
    quiet: bool,
}

impl StderrNotifier {
    /// Creates a notifier; a quiet one only logs.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

#[async_trait]
impl Notifier for StderrNotifier {
    async fn notify(&self, instance_id: i32, message: Message) {
        debug!(instance_id, ?message, "Notification");
        if !self.quiet {
            eprintln!("[{instance_id}] {message}");
        }
    }
}
