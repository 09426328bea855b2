//! Update orchestration.
//!
//! One [`UpdateOrchestrator::run`] call is one update of one widget instance:
//! acquire the single-flight slot, animate, fetch, apply the display policy,
//! persist, render, and (for user-initiated updates) notify.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use datapass_carriers::CarrierRegistry;
use datapass_core::{CARRIER_NOT_SELECTED, FetchOutcome, UpdateMode};
use datapass_fetch::FetchContext;
use datapass_store::{PreferenceStore, TrackedInstances};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::animation::{AnimationHandle, DEFAULT_FRAME_INTERVAL};
use crate::display::{DeviceInfo, Notifier, RenderFrame, WidgetRenderer};
use crate::error::UpdateError;
use crate::in_flight::InFlightSet;
use crate::policy::{DisplayResult, PolicyInput, display_for};

// ============================================================================
// Request / Report
// ============================================================================

/// One update to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Widget instance.
    pub instance_id: i32,
    /// Operator name or the not-selected sentinel.
    pub carrier: String,
    /// Feedback level.
    pub mode: UpdateMode,
}

impl UpdateRequest {
    /// Creates a request.
    pub fn new(instance_id: i32, carrier: impl Into<String>, mode: UpdateMode) -> Self {
        Self {
            instance_id,
            carrier: carrier.into(),
            mode,
        }
    }
}

/// What an update did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// Widget instance.
    pub instance_id: i32,
    /// Carrier the update ran for.
    pub carrier: String,
    /// Feedback level.
    pub mode: UpdateMode,
    /// Supplier outcome.
    pub outcome: FetchOutcome,
    /// Final widget state.
    pub display: DisplayResult,
    /// Whether a notification was shown.
    pub notified: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Runs widget updates. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct UpdateOrchestrator {
    ctx: Arc<FetchContext>,
    instances: TrackedInstances,
    in_flight: InFlightSet,
    renderer: Arc<dyn WidgetRenderer>,
    notifier: Arc<dyn Notifier>,
    device: Arc<dyn DeviceInfo>,
    frame_interval: Duration,
}

impl UpdateOrchestrator {
    /// Creates an orchestrator.
    pub fn new(
        ctx: FetchContext,
        instances: TrackedInstances,
        renderer: Arc<dyn WidgetRenderer>,
        notifier: Arc<dyn Notifier>,
        device: Arc<dyn DeviceInfo>,
    ) -> Self {
        Self {
            ctx: Arc::new(ctx),
            instances,
            in_flight: InFlightSet::new(),
            renderer,
            notifier,
            device,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Overrides the animation frame pacing.
    #[must_use]
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    /// Tracked widget instances.
    pub fn instances(&self) -> &TrackedInstances {
        &self.instances
    }

    /// Preference store holding cached usage.
    pub fn prefs(&self) -> &PreferenceStore {
        self.instances.preferences()
    }

    /// Device state source.
    pub fn device(&self) -> &dyn DeviceInfo {
        self.device.as_ref()
    }

    /// Instances with an update in flight.
    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    /// Runs one update.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::ConcurrentRequestRejected`] if an update of the
    /// same instance is already running. Nothing is fetched, stored or
    /// rendered in that case.
    #[instrument(skip(self), fields(instance_id = request.instance_id, carrier = %request.carrier, mode = %request.mode))]
    pub async fn run(&self, request: UpdateRequest) -> Result<UpdateReport, UpdateError> {
        let UpdateRequest {
            instance_id,
            carrier,
            mode,
        } = request;

        let Some(_guard) = self.in_flight.try_acquire(instance_id) else {
            debug!("Update already running, request dropped");
            return Err(UpdateError::ConcurrentRequestRejected(instance_id));
        };

        let prefs = self.prefs();
        self.instances
            .mark_update_started(instance_id, Utc::now())
            .await;

        let network = self.device.network();
        let operator_name = self.device.operator_name();
        let cached = prefs.cached_usage(&carrier).await;
        let has_cache = prefs.has_usage_for(&carrier).await;

        let supplier = CarrierRegistry::resolve(&carrier);
        let animation = mode.shows_animation().then(|| {
            AnimationHandle::spawn(
                instance_id,
                cached.percentage,
                Arc::clone(&self.renderer),
                self.frame_interval,
            )
        });

        let outcome = supplier.fetch(&self.ctx).await;
        info!(supplier = supplier.id(), outcome = outcome.label(), "Fetch finished");

        let display = display_for(
            &outcome,
            &PolicyInput {
                network,
                operator_name: &operator_name,
                cached: &cached,
                has_cache,
            },
        );

        if display.persist {
            prefs.store_usage(&carrier, &display.to_cached()).await;
        }
        if let Err(e) = prefs.save().await {
            warn!(error = %e, "Failed to save preferences");
        }

        if let Some(animation) = animation {
            animation.finish(display.percentage).await;
        }
        self.renderer
            .render(instance_id, &RenderFrame::from(&display))
            .await;

        if mode == UpdateMode::Regular && carrier.contains(CARRIER_NOT_SELECTED) {
            self.renderer.request_carrier_selection(instance_id).await;
        }

        let notification = display.notification.filter(|_| mode.shows_notifications());
        if let Some(message) = notification {
            self.notifier.notify(instance_id, message).await;
        }

        Ok(UpdateReport {
            instance_id,
            carrier,
            mode,
            outcome,
            display,
            notified: notification.is_some(),
        })
    }
}

impl std::fmt::Debug for UpdateOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateOrchestrator")
            .field("ctx", &self.ctx)
            .field("in_flight", &self.in_flight)
            .field("frame_interval", &self.frame_interval)
            .finish_non_exhaustive()
    }
}
