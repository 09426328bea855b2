// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DataPass` Widget
//!
//! Update orchestration for home-screen usage widgets.
//!
//! The host (launcher integration, CLI, tests) implements three seams and
//! feeds triggers into the scheduler:
//!
//! - [`WidgetRenderer`] - Draws frames and asks for a carrier choice
//! - [`Notifier`] - Shows transient messages
//! - [`DeviceInfo`] - Reports network type, operator and SIM count
//!
//! Everything else lives here:
//!
//! - [`UpdateOrchestrator`] - One update: single-flight, fetch, policy, persist, render
//! - [`UpdateScheduler`] - Maps [`Trigger`]s to updates and modes
//! - [`animation`] - The loading sweep shown while a fetch runs
//! - [`policy`] - Outcome to display mapping
//!
//! ## Example
//!
//! ```ignore
//! use datapass_widget::{Trigger, UpdateOrchestrator, UpdateScheduler};
//!
//! let orchestrator = UpdateOrchestrator::new(ctx, instances, renderer, notifier, device);
//! let scheduler = UpdateScheduler::new(orchestrator);
//! for result in scheduler.handle(Trigger::Click { instance_id: 7 }).await {
//!     println!("{result:?}");
//! }
//! ```

pub mod animation;
pub mod display;
pub mod error;
pub mod in_flight;
pub mod orchestrator;
pub mod policy;
pub mod scheduler;

pub use animation::{AnimationHandle, DEFAULT_FRAME_INTERVAL, Interpolator, SWEEP_DURATION, Sweep};
pub use display::{DeviceInfo, LOADING_TEXT, Notifier, RenderFrame, StaticDevice, WidgetRenderer};
pub use error::UpdateError;
pub use in_flight::{InFlightGuard, InFlightSet};
pub use orchestrator::{UpdateOrchestrator, UpdateReport, UpdateRequest};
pub use policy::{DisplayResult, Hint, Message, PolicyInput, Severity, display_for};
pub use scheduler::{Trigger, UpdateScheduler};
