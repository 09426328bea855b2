//! Loading animation.
//!
//! While a fetch is running the gauge sweeps between empty and full. Forward
//! sweeps ease in and out, backward sweeps overshoot slightly before falling.
//! Once the fetch is done the driver finishes the sweep it is in, then
//! settles on the target percentage with one last pass.
//!
//! Frames flow through a channel of capacity one. When the renderer is still
//! busy with the previous frame, the new one is dropped instead of queued.

use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::display::{RenderFrame, WidgetRenderer};

/// Time for one full sweep from 0 to 100 percent.
pub const SWEEP_DURATION: Duration = Duration::from_millis(1000);

/// Default frame pacing (about 60 frames per second).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Tension of the backward overshoot curve.
pub const OVERSHOOT_TENSION: f64 = 0.6;

// ============================================================================
// Interpolation
// ============================================================================

/// Easing curve mapping sweep progress in `[0, 1]` to a fill level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolator {
    /// Slow start, fast middle, slow end.
    AccelerateDecelerate,
    /// Rises past the end before settling.
    Overshoot {
        /// How far the curve overshoots.
        tension: f64,
    },
}

impl Interpolator {
    /// Raw curve value. Progress is clamped to `[0, 1]`.
    pub fn interpolate(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::AccelerateDecelerate => ((x + 1.0) * PI).cos() / 2.0 + 0.5,
            Self::Overshoot { tension } => {
                let t = x - 1.0;
                t * t * ((tension + 1.0) * t + tension) + 1.0
            }
        }
    }

    /// Curve value as a whole percentage in `0..=100`.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn percent(self, x: f64) -> u8 {
        (self.interpolate(x) * 100.0).round().clamp(0.0, 100.0) as u8
    }

    /// Progress at which the curve comes closest to `value`.
    ///
    /// Searched in steps of 1/100; ties resolve to the smallest progress.
    pub fn offset_for(self, value: u8) -> f64 {
        let best = (0..=100u8)
            .min_by_key(|&i| {
                (i16::from(self.percent(f64::from(i) / 100.0)) - i16::from(value)).abs()
            })
            .unwrap_or(0);
        f64::from(best) / 100.0
    }
}

/// One pass of the gauge from `from` towards `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    from: u8,
    to: u8,
    interpolator: Interpolator,
    offset: f64,
}

impl Sweep {
    /// Plans a pass. Forward passes ease, backward passes overshoot.
    pub fn new(from: u8, to: u8) -> Self {
        let (from, to) = (from.min(100), to.min(100));
        let interpolator = if to >= from {
            Interpolator::AccelerateDecelerate
        } else {
            Interpolator::Overshoot {
                tension: OVERSHOOT_TENSION,
            }
        };
        Self {
            from,
            to,
            interpolator,
            offset: interpolator.offset_for(from),
        }
    }

    /// Whether the fill grows.
    pub fn is_forward(&self) -> bool {
        self.to >= self.from
    }

    /// Whether there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Fill level `elapsed` into the pass.
    pub fn value_at(&self, elapsed: Duration) -> u8 {
        let step = elapsed.as_secs_f64() / SWEEP_DURATION.as_secs_f64();
        let x = if self.is_forward() {
            self.offset + step
        } else {
            self.offset - step
        };
        self.interpolator.percent(x)
    }

    /// Whether `value` ends the pass.
    pub fn reached(&self, value: u8) -> bool {
        if self.is_forward() {
            value >= self.to
        } else {
            value <= self.to
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// A running loading animation for one widget instance.
#[derive(Debug)]
pub struct AnimationHandle {
    finish: watch::Sender<Option<u8>>,
    driver: JoinHandle<()>,
    consumer: JoinHandle<()>,
}

impl AnimationHandle {
    /// Starts animating `instance_id` from `start` percent.
    pub fn spawn(
        instance_id: i32,
        start: u8,
        renderer: Arc<dyn WidgetRenderer>,
        frame_interval: Duration,
    ) -> Self {
        let (finish_tx, finish_rx) = watch::channel(None);
        let (frame_tx, frame_rx) = mpsc::channel(1);

        debug!(instance_id, start, "Starting loading animation");
        let driver = tokio::spawn(drive(start, frame_interval, frame_tx, finish_rx));
        let consumer = tokio::spawn(present(instance_id, frame_rx, renderer));

        Self {
            finish: finish_tx,
            driver,
            consumer,
        }
    }

    /// Lets the animation settle on `target` and waits until it has.
    pub async fn finish(self, target: u8) {
        self.finish.send_replace(Some(target.min(100)));

        if let Err(e) = self.driver.await {
            warn!(error = %e, "Animation driver failed");
        }
        if let Err(e) = self.consumer.await {
            warn!(error = %e, "Animation consumer failed");
        }
    }
}

enum FinishState {
    Pending,
    Finished(u8),
    Abandoned,
}

fn finish_state(rx: &watch::Receiver<Option<u8>>) -> FinishState {
    if let Some(target) = *rx.borrow() {
        return FinishState::Finished(target);
    }
    if rx.has_changed().is_err() {
        FinishState::Abandoned
    } else {
        FinishState::Pending
    }
}

async fn drive(
    start: u8,
    frame_interval: Duration,
    frames: mpsc::Sender<u8>,
    finish: watch::Receiver<Option<u8>>,
) {
    let mut ticker = tokio::time::interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = None;

    run_sweep(Sweep::new(start, 100), &mut ticker, &frames, &mut last).await;

    let target = loop {
        match finish_state(&finish) {
            FinishState::Finished(target) => break target,
            FinishState::Abandoned => {
                debug!("Animation abandoned");
                return;
            }
            FinishState::Pending => {
                run_sweep(Sweep::new(100, 0), &mut ticker, &frames, &mut last).await;
                run_sweep(Sweep::new(0, 100), &mut ticker, &frames, &mut last).await;
            }
        }
    };

    run_sweep(Sweep::new(100, target), &mut ticker, &frames, &mut last).await;
    debug!(target, "Loading animation settled");
}

async fn run_sweep(
    sweep: Sweep,
    ticker: &mut tokio::time::Interval,
    frames: &mpsc::Sender<u8>,
    last: &mut Option<u8>,
) {
    if sweep.is_empty() {
        return;
    }

    let started = Instant::now();
    loop {
        ticker.tick().await;
        let value = sweep.value_at(started.elapsed());

        if *last != Some(value) {
            *last = Some(value);
            match frames.try_send(value) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => trace!(value, "Frame dropped"),
                Err(mpsc::error::TrySendError::Closed(_)) => return,
            }
        }

        if sweep.reached(value) {
            return;
        }
    }
}

async fn present(instance_id: i32, mut frames: mpsc::Receiver<u8>, renderer: Arc<dyn WidgetRenderer>) {
    while let Some(value) = frames.recv().await {
        renderer.render(instance_id, &RenderFrame::loading(value)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
