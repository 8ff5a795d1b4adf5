//! overdash-surface: host compositor contracts for Overdash.
//!
//! Defines the screen-space geometry the controller reasons in, the touch
//! events a host feeds into it, and the traits a host implements to composite
//! the overlay window, hold foreground status, and play audio cues. Mock
//! implementations with call logs and failure injection ship alongside the
//! traits for tests.

mod error;
mod geom;
mod input;
pub mod ops;

pub use error::{Error, Result};
pub use geom::{EDGE_MARGIN, Pos, Rect, Size, clamp_to_screen};
pub use input::{TouchEvent, TouchPhase};
pub use ops::{Compositor, Cue, CuePlayer, ForegroundKeeper, WindowId};
