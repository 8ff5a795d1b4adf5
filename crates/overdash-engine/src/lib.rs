//! Overdash Engine
//!
//! The Overdash engine crate owns the overlay window controller:
//! - enforces singleton overlay instantiation with awaited retirement
//! - classifies touch sequences into drags and taps
//! - animates edge snapping and expansion
//! - drives the delivery session timer and emits completed-session records
//!
//! The primary types are [`OverlayController`] (spawn the manager task) and
//! [`OverlayHandle`] (drive it). Host collaborators arrive through [`Deps`];
//! everything platform-specific stays behind the `overdash-surface` traits.

mod clock;
mod config;
mod error;
mod gesture;
mod manager;
mod notify;
mod session;
mod snap;
mod ticker;
mod window;

pub mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OverlayConfig;
pub use error::{Error, Result};
pub use gesture::{DRAG_TOLERANCE_PX, SETTLE_DELAY_MS, TAP_MAX_MS};
pub use manager::{ControllerStatus, Deps, OverlayController, OverlayHandle};
pub use session::{SESSION_TICK_MS, SessionStatus, format_elapsed};
pub use snap::{MEASURE_RETRY_MS, SNAP_ANIM_MS};
pub use window::{OverlayWindow, VisualState};
