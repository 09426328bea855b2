//! Trigger handling.
//!
//! Maps host events to updates:
//!
//! | Trigger | Instances | Mode | Throttled |
//! |---|---|---|---|
//! | Click | the clicked one | Regular | no |
//! | Instance added | the new one | Regular | no |
//! | Periodic | all tracked | Silent | yes |
//! | Mobile data connected | all tracked | Silent | yes |
//! | Wifi connected | all tracked | `UltraSilent` | yes |
//!
//! Other connectivity changes are ignored.

use chrono::Utc;
use datapass_core::{CARRIER_NOT_SELECTED, NetworkKind, UpdateMode};
use futures::future::join_all;
use tracing::{debug, info, instrument};

use crate::error::UpdateError;
use crate::orchestrator::{UpdateOrchestrator, UpdateReport, UpdateRequest};

/// A host event that may start updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The user tapped an instance.
    Click {
        /// Tapped instance.
        instance_id: i32,
    },
    /// A widget was placed.
    InstanceAdded {
        /// New instance.
        instance_id: i32,
    },
    /// A widget was removed.
    InstanceRemoved {
        /// Removed instance.
        instance_id: i32,
    },
    /// The refresh interval elapsed.
    Periodic,
    /// The active network changed.
    ConnectivityChanged(Option<NetworkKind>),
}

/// Turns triggers into orchestrated updates.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    orchestrator: UpdateOrchestrator,
}

impl UpdateScheduler {
    /// Creates a scheduler.
    pub fn new(orchestrator: UpdateOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// The orchestrator updates run on.
    pub fn orchestrator(&self) -> &UpdateOrchestrator {
        &self.orchestrator
    }

    /// Carrier for a freshly placed widget.
    ///
    /// Multi-SIM devices start unselected; otherwise the current operator is
    /// used, falling back to unselected when the device reports none.
    pub fn carrier_for_new_instance(&self) -> String {
        let device = self.orchestrator.device();
        if device.is_multi_sim() {
            return CARRIER_NOT_SELECTED.to_string();
        }
        non_empty_or_sentinel(device.operator_name())
    }

    /// Carrier for a scheduled update of a widget that stored `stored`.
    ///
    /// A multi-SIM device keeps an unselected widget unselected. Otherwise
    /// the current operator wins, then the stored carrier.
    pub fn carrier_for_existing(&self, stored: &str) -> String {
        let device = self.orchestrator.device();
        if stored == CARRIER_NOT_SELECTED && device.is_multi_sim() {
            return CARRIER_NOT_SELECTED.to_string();
        }
        let operator = device.operator_name();
        if operator.is_empty() {
            non_empty_or_sentinel(stored.to_string())
        } else {
            operator
        }
    }

    /// Handles one trigger and returns the result of every update it started.
    ///
    /// # Errors
    ///
    /// Per-update errors are returned in the list; a click on an untracked
    /// instance yields [`UpdateError::UnknownInstance`].
    #[instrument(skip(self))]
    pub async fn handle(&self, trigger: Trigger) -> Vec<Result<UpdateReport, UpdateError>> {
        let instances = self.orchestrator.instances();

        match trigger {
            Trigger::Click { instance_id } => {
                let Some(carrier) = instances.carrier_for(instance_id).await else {
                    return vec![Err(UpdateError::UnknownInstance(instance_id))];
                };
                let request = UpdateRequest::new(instance_id, carrier, UpdateMode::Regular);
                vec![self.orchestrator.run(request).await]
            }
            Trigger::InstanceAdded { instance_id } => {
                let carrier = self.carrier_for_new_instance();
                instances.add(instance_id, &carrier).await;
                info!(instance_id, carrier = %carrier, "Instance added");
                let request = UpdateRequest::new(instance_id, carrier, UpdateMode::Regular);
                vec![self.orchestrator.run(request).await]
            }
            Trigger::InstanceRemoved { instance_id } => {
                let removed = instances.remove(instance_id).await;
                info!(instance_id, found = removed.is_some(), "Instance removed");
                if let Err(e) = self.orchestrator.prefs().save().await {
                    return vec![Err(e.into())];
                }
                Vec::new()
            }
            Trigger::Periodic => self.update_due(UpdateMode::Silent, true).await,
            Trigger::ConnectivityChanged(Some(NetworkKind::Mobile)) => {
                self.update_due(UpdateMode::Silent, false).await
            }
            Trigger::ConnectivityChanged(Some(NetworkKind::Wifi)) => {
                self.update_due(UpdateMode::UltraSilent, false).await
            }
            Trigger::ConnectivityChanged(network) => {
                debug!(?network, "Connectivity change ignored");
                Vec::new()
            }
        }
    }

    /// Updates every tracked instance whose throttle expired, concurrently.
    async fn update_due(
        &self,
        mode: UpdateMode,
        refresh_carrier: bool,
    ) -> Vec<Result<UpdateReport, UpdateError>> {
        let instances = self.orchestrator.instances();
        let now = Utc::now();
        let mut requests = Vec::new();

        for instance in instances.all().await {
            if !instances.last_update_timeout_over(instance.id, now).await {
                debug!(instance_id = instance.id, "Throttled");
                continue;
            }

            let carrier = if refresh_carrier {
                let carrier = self.carrier_for_existing(&instance.carrier);
                if carrier != instance.carrier {
                    info!(instance_id = instance.id, from = %instance.carrier, to = %carrier, "Carrier changed");
                    instances.add(instance.id, &carrier).await;
                }
                carrier
            } else {
                instance.carrier
            };
            requests.push(UpdateRequest::new(instance.id, carrier, mode));
        }

        debug!(count = requests.len(), %mode, "Starting scheduled updates");
        join_all(requests.into_iter().map(|r| self.orchestrator.run(r))).await
    }
}

fn non_empty_or_sentinel(carrier: String) -> String {
    if carrier.is_empty() {
        CARRIER_NOT_SELECTED.to_string()
    } else {
        carrier
    }
}
