//! Tracked widget instances.
//!
//! Every placed widget is tracked as `(id, carrier)` in the preference
//! store, together with the time its last update started. The timestamp
//! throttles automatic updates so a burst of triggers cannot hammer the
//! carrier page.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::preferences::PreferenceStore;

/// Set key holding `"<id>,<carrier>"` entries.
pub const TRACKED_INSTANCES_KEY: &str = "app_ids";

/// Prefix of the per-instance update timestamp key.
pub const LAST_UPDATE_TIMESTAMP_KEY: &str = "last_update_timestamp";

/// Minimum time between two automatic updates of one instance.
pub const DEFAULT_MIN_TIME_BETWEEN_REQUESTS: Duration = Duration::from_secs(15);

// ============================================================================
// Tracked Instance
// ============================================================================

/// One placed widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedInstance {
    /// Host-assigned widget id.
    pub id: i32,
    /// Carrier text the widget reads usage for.
    pub carrier: String,
}

impl TrackedInstance {
    /// Creates an instance.
    pub fn new(id: i32, carrier: impl Into<String>) -> Self {
        Self {
            id,
            carrier: carrier.into(),
        }
    }

    fn encode(&self) -> String {
        format!("{},{}", self.id, self.carrier)
    }

    /// Splits on the first comma; the carrier may itself contain commas.
    fn decode(entry: &str) -> Option<Self> {
        let (id, carrier) = entry.split_once(',')?;
        Some(Self::new(id.trim().parse().ok()?, carrier))
    }
}

// ============================================================================
// Tracked Instances
// ============================================================================

/// Registry of placed widgets, stored in the preference store.
#[derive(Debug, Clone)]
pub struct TrackedInstances {
    prefs: PreferenceStore,
    min_time_between_requests: Duration,
}

impl TrackedInstances {
    /// Creates a registry over `prefs`.
    pub fn new(prefs: PreferenceStore) -> Self {
        Self {
            prefs,
            min_time_between_requests: DEFAULT_MIN_TIME_BETWEEN_REQUESTS,
        }
    }

    /// Overrides the throttle interval.
    #[must_use]
    pub fn with_min_time_between_requests(mut self, interval: Duration) -> Self {
        self.min_time_between_requests = interval;
        self
    }

    /// The underlying preference store.
    pub fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// All decodable entries, ordered by id.
    pub async fn all(&self) -> Vec<TrackedInstance> {
        let mut instances: Vec<_> = self
            .prefs
            .get_set(TRACKED_INSTANCES_KEY)
            .await
            .iter()
            .filter_map(|entry| TrackedInstance::decode(entry))
            .collect();
        instances.sort_by_key(|i| i.id);
        instances
    }

    /// Tracks `id` with `carrier`, replacing any previous carrier.
    pub async fn add(&self, id: i32, carrier: &str) {
        let entry = TrackedInstance::new(id, carrier).encode();
        self.prefs
            .edit(|data| {
                let set = data
                    .string_sets
                    .entry(TRACKED_INSTANCES_KEY.to_string())
                    .or_default();
                set.retain(|e| TrackedInstance::decode(e).is_none_or(|i| i.id != id));
                set.insert(entry);
            })
            .await;
        debug!(instance_id = id, carrier, "Tracking instance");
    }

    /// Stops tracking `id`; returns its carrier if it was tracked.
    pub async fn remove(&self, id: i32) -> Option<String> {
        let mut removed = None;
        self.prefs
            .edit(|data| {
                if let Some(set) = data.string_sets.get_mut(TRACKED_INSTANCES_KEY) {
                    set.retain(|e| match TrackedInstance::decode(e) {
                        Some(i) if i.id == id => {
                            removed = Some(i.carrier);
                            false
                        }
                        _ => true,
                    });
                }
                data.ints.remove(&timestamp_key(id));
            })
            .await;
        debug!(instance_id = id, found = removed.is_some(), "Removed instance");
        removed
    }

    /// Carrier of `id`, if tracked.
    pub async fn carrier_for(&self, id: i32) -> Option<String> {
        self.all()
            .await
            .into_iter()
            .find(|i| i.id == id)
            .map(|i| i.carrier)
    }

    /// Drops every entry whose id is not in `live`. Returns what was dropped.
    pub async fn prune(&self, live: &[i32]) -> Vec<TrackedInstance> {
        let mut dropped = Vec::new();
        self.prefs
            .edit(|data| {
                let Some(set) = data.string_sets.get_mut(TRACKED_INSTANCES_KEY) else {
                    return;
                };
                let kept: BTreeSet<String> = set
                    .iter()
                    .filter(|e| match TrackedInstance::decode(e) {
                        Some(i) if live.contains(&i.id) => true,
                        Some(i) => {
                            dropped.push(i);
                            false
                        }
                        None => false,
                    })
                    .cloned()
                    .collect();
                *set = kept;
                for instance in &dropped {
                    data.ints.remove(&timestamp_key(instance.id));
                }
            })
            .await;
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Pruned stale instances");
        }
        dropped
    }

    // ========================================================================
    // Throttle
    // ========================================================================

    /// Records that an update of `id` started at `now`.
    pub async fn mark_update_started(&self, id: i32, now: DateTime<Utc>) {
        self.prefs
            .put_int(&timestamp_key(id), now.timestamp_millis())
            .await;
    }

    /// When the last update of `id` started.
    pub async fn last_update(&self, id: i32) -> Option<DateTime<Utc>> {
        let millis = self.prefs.get_int(&timestamp_key(id)).await?;
        DateTime::from_timestamp_millis(millis)
    }

    /// True if `id` never updated or its last update started more than the
    /// throttle interval before `now`.
    pub async fn last_update_timeout_over(&self, id: i32, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_update(id).await else {
            return true;
        };
        let interval = chrono::Duration::from_std(self.min_time_between_requests)
            .unwrap_or(chrono::Duration::MAX);
        last.checked_add_signed(interval).is_none_or(|t| t < now)
    }
}

fn timestamp_key(id: i32) -> String {
    format!("{LAST_UPDATE_TIMESTAMP_KEY}{id}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TrackedInstances {
        TrackedInstances::new(PreferenceStore::in_memory())
    }

    #[test]
    fn test_entry_encoding() {
        let instance = TrackedInstance::new(42, "Telekom.de");
        assert_eq!(instance.encode(), "42,Telekom.de");
        assert_eq!(TrackedInstance::decode("42,Telekom.de"), Some(instance));
        assert_eq!(
            TrackedInstance::decode("7,a,b").map(|i| i.carrier),
            Some("a,b".to_string())
        );
        assert!(TrackedInstance::decode("garbage").is_none());
        assert!(TrackedInstance::decode("x,Telekom").is_none());
    }

    #[tokio::test]
    async fn test_add_remove_lookup() {
        let instances = registry();
        instances.add(1, "Telekom.de").await;
        instances.add(2, "congstar").await;

        assert_eq!(instances.carrier_for(1).await.as_deref(), Some("Telekom.de"));
        assert_eq!(instances.all().await.len(), 2);

        assert_eq!(instances.remove(1).await.as_deref(), Some("Telekom.de"));
        assert_eq!(instances.remove(1).await, None);
        assert_eq!(instances.all().await, vec![TrackedInstance::new(2, "congstar")]);
    }

    #[tokio::test]
    async fn test_add_replaces_carrier() {
        let instances = registry();
        instances.add(5, "CARRIER_NOT_SELECTED").await;
        instances.add(5, "congstar").await;
        assert_eq!(instances.all().await, vec![TrackedInstance::new(5, "congstar")]);
    }

    #[tokio::test]
    async fn test_prune() {
        let instances = registry();
        for id in [1, 2, 3] {
            instances.add(id, "Telekom").await;
        }
        let dropped = instances.prune(&[2]).await;
        assert_eq!(dropped.len(), 2);
        assert_eq!(instances.all().await, vec![TrackedInstance::new(2, "Telekom")]);
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[tokio::test]
    async fn test_throttle() {
        let instances = registry();
        let start = fixed_now();
        assert!(instances.last_update_timeout_over(9, start).await);

        instances.mark_update_started(9, start).await;
        assert!(
            !instances
                .last_update_timeout_over(9, start + chrono::Duration::seconds(10))
                .await
        );
        assert!(
            !instances
                .last_update_timeout_over(9, start + chrono::Duration::seconds(15))
                .await
        );
        assert!(
            instances
                .last_update_timeout_over(9, start + chrono::Duration::seconds(16))
                .await
        );
    }

    #[tokio::test]
    async fn test_custom_throttle_interval() {
        let instances = registry().with_min_time_between_requests(Duration::from_secs(60));
        let start = fixed_now();
        instances.mark_update_started(1, start).await;
        assert!(
            !instances
                .last_update_timeout_over(1, start + chrono::Duration::seconds(30))
                .await
        );
    }
}
