//! End-to-end update tests against canned pages.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use datapass_carriers::{PROVIDER_MARKER, VOLUME_USED_UP_MARKER};
use datapass_core::{CARRIER_NOT_SELECTED, FetchOutcome, NetworkKind, UpdateMode};
use datapass_fetch::{FetchContext, FixtureSource};
use datapass_store::{CachedUsage, PreferenceStore, TrackedInstances};
use datapass_widget::{
    Hint, Message, Notifier, RenderFrame, Severity, StaticDevice, Trigger, UpdateError,
    UpdateOrchestrator, UpdateRequest, UpdateScheduler, WidgetRenderer,
};

// ============================================================================
// Test Host
// ============================================================================

#[derive(Default)]
struct RecordingRenderer {
    frames: Mutex<Vec<(i32, RenderFrame)>>,
    selections: Mutex<Vec<i32>>,
}

impl RecordingRenderer {
    fn frames_for(&self, id: i32) -> Vec<RenderFrame> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|(i, _)| *i == id)
            .map(|(_, f)| f.clone())
            .collect()
    }

    fn loading_frames(&self) -> usize {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, f)| f.is_loading())
            .count()
    }
}

#[async_trait]
impl WidgetRenderer for RecordingRenderer {
    async fn render(&self, instance_id: i32, frame: &RenderFrame) {
        self.frames.lock().unwrap().push((instance_id, frame.clone()));
    }

    async fn request_carrier_selection(&self, instance_id: i32) {
        self.selections.lock().unwrap().push(instance_id);
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(i32, Message)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, instance_id: i32, message: Message) {
        self.messages.lock().unwrap().push((instance_id, message));
    }
}

struct Harness {
    orchestrator: UpdateOrchestrator,
    source: Arc<FixtureSource>,
    renderer: Arc<RecordingRenderer>,
    notifier: Arc<RecordingNotifier>,
}

impl Harness {
    fn new(source: FixtureSource, device: StaticDevice) -> Self {
        let source = Arc::new(source);
        let renderer = Arc::new(RecordingRenderer::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let orchestrator = UpdateOrchestrator::new(
            FetchContext::with_source(source.clone()),
            TrackedInstances::new(PreferenceStore::in_memory()),
            renderer.clone(),
            notifier.clone(),
            Arc::new(device),
        );
        Self {
            orchestrator,
            source,
            renderer,
            notifier,
        }
    }

    fn messages(&self) -> Vec<(i32, Message)> {
        self.notifier.messages.lock().unwrap().clone()
    }
}

fn telekom_page(volume: &str) -> String {
    format!(
        r#"<html><body>
        <div class="volume fit-text-to-container">{volume}</div>
        <p>Stand: 24.03.2024 um 13:37 Uhr</p>
        <footer>{PROVIDER_MARKER}</footer>
        </body></html>"#
    )
}

fn wasted_page() -> String {
    format!("<html><body><h1>{VOLUME_USED_UP_MARKER}</h1>{PROVIDER_MARKER}</body></html>")
}

const TELEKOM: &str = "Telekom.de";
const CONGSTAR: &str = "congstar";

// ============================================================================
// Orchestrator
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_regular_success_end_to_end() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("12,3 MB von 5,0 GB")).with_delay(Duration::from_secs(2)),
        StaticDevice::mobile(TELEKOM),
    );

    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
        .await
        .unwrap();

    assert!(report.outcome.is_success());
    assert_eq!(report.display.percentage, 0);
    assert_eq!(report.display.unit, "GB");
    assert_eq!(report.display.proportion, "0,0/5,0");
    assert_eq!(report.display.last_update, "24.03. - 13:37");
    assert_eq!(report.display.severity, Severity::Normal);
    assert!(report.notified);
    assert_eq!(h.messages(), vec![(1, Message::UpdateSucceeded)]);
    assert_eq!(h.source.calls(), 1);

    let frames = h.renderer.frames_for(1);
    assert!(frames.iter().any(RenderFrame::is_loading));
    let last = frames.last().unwrap();
    assert!(last.enable_interaction);
    assert_eq!(last.proportion, "0,0/5,0");

    let cached = h.orchestrator.prefs().cached_usage(TELEKOM).await;
    assert_eq!(cached.proportion, "0,0/5,0");
    assert_eq!(cached.hint, "");
    assert!(h.orchestrator.in_flight().is_empty());
    assert!(h.orchestrator.instances().last_update(1).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_request_is_rejected_without_side_effects() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")).with_delay(Duration::from_secs(3)),
        StaticDevice::mobile(TELEKOM),
    );

    let first = tokio::spawn({
        let orchestrator = h.orchestrator.clone();
        async move {
            orchestrator
                .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
                .await
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.orchestrator.in_flight().contains(1));

    let started = h.orchestrator.instances().last_update(1).await;

    let err = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
        .await
        .unwrap_err();
    assert!(matches!(err, UpdateError::ConcurrentRequestRejected(1)));
    assert!(err.is_silent());
    assert_eq!(h.orchestrator.instances().last_update(1).await, started);
    assert!(h.renderer.frames_for(1).iter().all(RenderFrame::is_loading));

    let report = first.await.unwrap().unwrap();
    let final_frames: Vec<_> = h
        .renderer
        .frames_for(1)
        .into_iter()
        .filter(|f| f.enable_interaction)
        .collect();
    assert_eq!(final_frames.len(), 1);
    assert_eq!(final_frames[0].percentage, 25);
    assert_eq!(report.display.percentage, 25);
    assert_eq!(h.source.calls(), 1);
    assert_eq!(h.messages().len(), 1);
    assert!(!h.orchestrator.in_flight().contains(1));
}

fn congstar_page(volume: &str) -> String {
    format!(
        r#"<html><body>
        <div class="volume fit-text-to-container">{volume}</div>
        <p>Stand: 02.04.2024 um 08:15 Uhr</p>
        </body></html>"#
    )
}

#[tokio::test(start_paused = true)]
async fn test_different_carriers_keep_their_own_usage() {
    let prefs = PreferenceStore::in_memory();
    let renderer = Arc::new(RecordingRenderer::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let orchestrator_for = |page: String, delay: Duration, operator: &str| {
        UpdateOrchestrator::new(
            FetchContext::with_source(Arc::new(FixtureSource::body(page).with_delay(delay))),
            TrackedInstances::new(prefs.clone()),
            renderer.clone(),
            notifier.clone(),
            Arc::new(StaticDevice::mobile(operator)),
        )
    };
    let telekom = orchestrator_for(
        telekom_page("1 GB von 4 GB"),
        Duration::from_secs(2),
        TELEKOM,
    );
    let congstar = orchestrator_for(
        congstar_page("3 GB von 4 GB"),
        Duration::from_secs(1),
        CONGSTAR,
    );

    let (a, b) = tokio::join!(
        telekom.run(UpdateRequest::new(1, TELEKOM, UpdateMode::Silent)),
        congstar.run(UpdateRequest::new(2, CONGSTAR, UpdateMode::Silent)),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!((a.carrier.as_str(), a.display.percentage), (TELEKOM, 25));
    assert_eq!((b.carrier.as_str(), b.display.percentage), (CONGSTAR, 75));
    assert_eq!(a.display.proportion, "1,0/4,0");
    assert_eq!(b.display.proportion, "3,0/4,0");
    assert_eq!(b.display.last_update, "02.04. - 08:15");

    let telekom_cached = prefs.cached_usage(TELEKOM).await;
    let congstar_cached = prefs.cached_usage(CONGSTAR).await;
    assert_eq!(telekom_cached.percentage, 25);
    assert_eq!(telekom_cached.proportion, "1,0/4,0");
    assert_eq!(telekom_cached.last_update, "24.03. - 13:37");
    assert_eq!(congstar_cached.percentage, 75);
    assert_eq!(congstar_cached.proportion, "3,0/4,0");
    assert_eq!(congstar_cached.last_update, "02.04. - 08:15");

    assert_eq!(renderer.frames_for(1).last().unwrap().percentage, 25);
    assert_eq!(renderer.frames_for(2).last().unwrap().percentage, 75);
    assert!(notifier.messages.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_ultra_silent_never_notifies_or_animates() {
    let cases = [
        (FixtureSource::body(telekom_page("1 GB von 4 GB")), TELEKOM),
        (FixtureSource::body(wasted_page()), TELEKOM),
        (FixtureSource::failing("no route"), TELEKOM),
        (FixtureSource::body("<html></html>"), "Vodafone.de"),
        (FixtureSource::body("<html></html>"), CARRIER_NOT_SELECTED),
    ];

    for (source, carrier) in cases {
        let h = Harness::new(source, StaticDevice::mobile(TELEKOM));
        let report = h
            .orchestrator
            .run(UpdateRequest::new(3, carrier, UpdateMode::UltraSilent))
            .await
            .unwrap();

        assert!(!report.notified, "{carrier}: {}", report.outcome);
        assert!(h.messages().is_empty());
        assert_eq!(h.renderer.loading_frames(), 0);
        assert_eq!(h.renderer.frames_for(3).len(), 1);
        assert!(h.renderer.selections.lock().unwrap().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_silent_animates_without_notification() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")).with_delay(Duration::from_secs(2)),
        StaticDevice::mobile(TELEKOM),
    );
    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Silent))
        .await
        .unwrap();

    assert_eq!(report.display.notification, Some(Message::UpdateSucceeded));
    assert!(!report.notified);
    assert!(h.messages().is_empty());
    assert!(h.renderer.loading_frames() > 0);
}

#[tokio::test(start_paused = true)]
async fn test_wasted_page_fills_gauge() {
    let h = Harness::new(FixtureSource::body(wasted_page()), StaticDevice::mobile(TELEKOM));
    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
        .await
        .unwrap();

    assert_eq!(report.outcome, FetchOutcome::Wasted);
    assert_eq!(report.display.percentage, 100);
    assert_eq!(report.display.severity, Severity::Warning);
    assert_eq!(h.messages(), vec![(1, Message::VolumeUsedUp)]);

    let cached = h.orchestrator.prefs().cached_usage(TELEKOM).await;
    assert_eq!(cached.percentage, 100);
    assert_eq!(cached.proportion, "");
    assert_eq!(cached.hint, Hint::VolumeUsedUp.text());
}

#[tokio::test(start_paused = true)]
async fn test_not_selected_makes_no_request_and_asks_for_carrier() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM).with_sim_count(2),
    );

    let report = h
        .orchestrator
        .run(UpdateRequest::new(4, CARRIER_NOT_SELECTED, UpdateMode::Regular))
        .await
        .unwrap();

    assert_eq!(report.outcome, FetchOutcome::CarrierNotSelected);
    assert_eq!(report.display.percentage, 0);
    assert_eq!(report.display.hint, Hint::CarrierNotSelected.text());
    assert_eq!(h.source.calls(), 0);
    assert_eq!(*h.renderer.selections.lock().unwrap(), vec![4]);
    assert_eq!(h.messages(), vec![(4, Message::CarrierNotSelected)]);

    h.orchestrator
        .run(UpdateRequest::new(4, CARRIER_NOT_SELECTED, UpdateMode::Silent))
        .await
        .unwrap();
    assert_eq!(h.renderer.selections.lock().unwrap().len(), 1);
    assert_eq!(h.source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_carrier_makes_no_request() {
    let h = Harness::new(FixtureSource::body("<html></html>"), StaticDevice::mobile("Vodafone.de"));
    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, "Vodafone.de", UpdateMode::Regular))
        .await
        .unwrap();

    assert_eq!(report.outcome, FetchOutcome::CarrierUnavailable);
    assert_eq!(h.source.calls(), 0);
    assert_eq!(h.messages(), vec![(1, Message::CarrierUnsupported)]);
    assert!(!h.orchestrator.prefs().has_usage_for("Vodafone.de").await);
}

#[tokio::test(start_paused = true)]
async fn test_error_keeps_cached_reading() {
    let h = Harness::new(FixtureSource::failing("timeout"), StaticDevice::mobile(TELEKOM));
    let cached = CachedUsage {
        proportion: "1,0/4,0".to_string(),
        unit: "GB".to_string(),
        percentage: 25,
        last_update: "24.03. - 13:37".to_string(),
        hint: String::new(),
    };
    h.orchestrator.prefs().store_usage(TELEKOM, &cached).await;

    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
        .await
        .unwrap();

    assert_eq!(report.outcome, FetchOutcome::Error);
    assert_eq!(report.display.percentage, 25);
    assert_eq!(report.display.proportion, "1,0/4,0");
    assert_eq!(report.display.hint, "");
    assert_eq!(report.display.severity, Severity::Neutral);
    assert_eq!(h.messages(), vec![(1, Message::UpdateFailedMobile)]);
    assert_eq!(h.orchestrator.prefs().cached_usage(TELEKOM).await, cached);
    assert_eq!(h.source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_error_without_cache_shows_hint() {
    let device = StaticDevice::mobile(TELEKOM).with_network(Some(NetworkKind::Wifi));
    let h = Harness::new(FixtureSource::failing("unreachable"), device);

    let report = h
        .orchestrator
        .run(UpdateRequest::new(1, TELEKOM, UpdateMode::Regular))
        .await
        .unwrap();

    assert_eq!(report.display.hint, Hint::TurnOffWifi.text());
    assert_eq!(report.display.percentage, 0);
    assert_eq!(h.messages(), vec![(1, Message::UpdateFailedWifi)]);
    assert!(!h.orchestrator.prefs().has_usage_for(TELEKOM).await);
}

// ============================================================================
// Scheduler
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_instance_added_tracks_operator() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM),
    );
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());

    let results = scheduler.handle(Trigger::InstanceAdded { instance_id: 9 }).await;
    assert_eq!(results.len(), 1);
    let report = results.into_iter().next().unwrap().unwrap();
    assert_eq!(report.mode, UpdateMode::Regular);
    assert_eq!(report.carrier, TELEKOM);
    assert_eq!(
        h.orchestrator.instances().carrier_for(9).await.as_deref(),
        Some(TELEKOM)
    );
}

#[tokio::test(start_paused = true)]
async fn test_instance_added_on_multi_sim_is_unselected() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM).with_sim_count(2),
    );
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());

    let results = scheduler.handle(Trigger::InstanceAdded { instance_id: 9 }).await;
    let report = results.into_iter().next().unwrap().unwrap();
    assert_eq!(report.carrier, CARRIER_NOT_SELECTED);
    assert_eq!(h.source.calls(), 0);
    assert_eq!(*h.renderer.selections.lock().unwrap(), vec![9]);
}

#[tokio::test(start_paused = true)]
async fn test_click_on_unknown_instance() {
    let h = Harness::new(FixtureSource::body(""), StaticDevice::mobile(TELEKOM));
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());

    let results = scheduler.handle(Trigger::Click { instance_id: 5 }).await;
    assert!(matches!(results[..], [Err(UpdateError::UnknownInstance(5))]));
    assert_eq!(h.source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_is_silent_and_throttled() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM),
    );
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());
    h.orchestrator.instances().add(1, TELEKOM).await;
    h.orchestrator.instances().add(2, TELEKOM).await;

    let results = scheduler.handle(Trigger::Periodic).await;
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.as_ref().is_ok_and(|r| r.mode == UpdateMode::Silent)));
    assert!(h.messages().is_empty());

    let results = scheduler.handle(Trigger::Periodic).await;
    assert!(results.is_empty());
    assert_eq!(h.source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_periodic_follows_operator_change() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM),
    );
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());
    h.orchestrator.instances().add(1, "congstar").await;

    let results = scheduler.handle(Trigger::Periodic).await;
    let report = results.into_iter().next().unwrap().unwrap();
    assert_eq!(report.carrier, TELEKOM);
    assert_eq!(
        h.orchestrator.instances().carrier_for(1).await.as_deref(),
        Some(TELEKOM)
    );
}

#[tokio::test(start_paused = true)]
async fn test_connectivity_modes() {
    let h = Harness::new(
        FixtureSource::body(telekom_page("1 GB von 4 GB")),
        StaticDevice::mobile(TELEKOM),
    );
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());
    h.orchestrator.instances().add(1, TELEKOM).await;

    assert!(scheduler
        .handle(Trigger::ConnectivityChanged(Some(NetworkKind::Other)))
        .await
        .is_empty());
    assert!(scheduler.handle(Trigger::ConnectivityChanged(None)).await.is_empty());

    let results = scheduler
        .handle(Trigger::ConnectivityChanged(Some(NetworkKind::Wifi)))
        .await;
    let report = results.into_iter().next().unwrap().unwrap();
    assert_eq!(report.mode, UpdateMode::UltraSilent);
    assert_eq!(h.renderer.loading_frames(), 0);

    h.orchestrator.instances().add(2, TELEKOM).await;
    let results = scheduler
        .handle(Trigger::ConnectivityChanged(Some(NetworkKind::Mobile)))
        .await;
    assert_eq!(results.len(), 1);
    let report = results.into_iter().next().unwrap().unwrap();
    assert_eq!(report.instance_id, 2);
    assert_eq!(report.mode, UpdateMode::Silent);
}

#[tokio::test(start_paused = true)]
async fn test_instance_removed() {
    let h = Harness::new(FixtureSource::body(""), StaticDevice::mobile(TELEKOM));
    let scheduler = UpdateScheduler::new(h.orchestrator.clone());
    h.orchestrator.instances().add(1, TELEKOM).await;

    assert!(scheduler
        .handle(Trigger::InstanceRemoved { instance_id: 1 })
        .await
        .is_empty());
    assert!(h.orchestrator.instances().all().await.is_empty());
}

#[test]
fn test_carrier_selection_rules() {
    let scheduler = |device: StaticDevice| {
        UpdateScheduler::new(UpdateOrchestrator::new(
            FetchContext::with_source(Arc::new(FixtureSource::body(""))),
            TrackedInstances::new(PreferenceStore::in_memory()),
            Arc::new(RecordingRenderer::default()),
            Arc::new(RecordingNotifier::default()),
            Arc::new(device),
        ))
    };

    let single = scheduler(StaticDevice::mobile(TELEKOM));
    assert_eq!(single.carrier_for_new_instance(), TELEKOM);
    assert_eq!(single.carrier_for_existing(CARRIER_NOT_SELECTED), TELEKOM);

    let dual = scheduler(StaticDevice::mobile(TELEKOM).with_sim_count(2));
    assert_eq!(dual.carrier_for_new_instance(), CARRIER_NOT_SELECTED);
    assert_eq!(dual.carrier_for_existing(CARRIER_NOT_SELECTED), CARRIER_NOT_SELECTED);
    assert_eq!(dual.carrier_for_existing("congstar"), TELEKOM);

    let silent = scheduler(StaticDevice::mobile(""));
    assert_eq!(silent.carrier_for_new_instance(), CARRIER_NOT_SELECTED);
    assert_eq!(silent.carrier_for_existing("congstar"), "congstar");
    assert_eq!(silent.carrier_for_existing(""), CARRIER_NOT_SELECTED);
}
