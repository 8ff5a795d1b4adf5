//! Drag gesture classification.
//!
//! Converts the host's raw touch sequence into drag, tap, or pass-through
//! outcomes. The classifier is a pure function over an owned [`GestureState`];
//! the manager applies the returned outcome (layout updates, snap scheduling,
//! expand triggers) itself.

use overdash_surface::{Pos, Rect, Size, TouchEvent, TouchPhase, clamp_to_screen};
use tracing::trace;

use crate::window::{OverlayWindow, VisualState};

/// Displacement (either axis) beyond which a touch becomes a drag.
pub const DRAG_TOLERANCE_PX: i32 = 10;

/// Maximum press duration for a down-only touch to count as a tap.
pub const TAP_MAX_MS: u64 = 200;

/// Delay between drag release and the edge-snap animation.
pub const SETTLE_DELAY_MS: u64 = 100;

/// Phase of the active touch sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No touch sequence in progress.
    #[default]
    Idle,
    /// Finger down, displacement still within tolerance.
    Down,
    /// Tolerance exceeded; window follows the finger.
    Dragging,
}

/// Per-touch-sequence state. Reset to idle on every UP.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureState {
    /// Current phase; transitions only Idle→Down→{Dragging|Idle}.
    pub phase: GesturePhase,
    /// Window position when the sequence started.
    pub origin_window: Pos,
    /// Raw touch position when the sequence started.
    pub origin_touch: Pos,
    /// Clock timestamp of the DOWN event, epoch ms.
    pub started_ms: u64,
}

impl GestureState {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What the manager should do with a touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Pass the event through to the underlying view (protected region hit,
    /// or a non-drag release that may still be a click).
    NotHandled,
    /// Event consumed with no visible effect (down recorded, or movement
    /// still within tolerance).
    Consumed,
    /// DOWN landed on a minimized window: expand immediately, event fully
    /// handled regardless of what the finger does next.
    ExpandShortcut,
    /// Drag in progress: apply this clamped window position now.
    Drag(Pos),
    /// Drag released: suppress the click and schedule the edge snap after
    /// [`SETTLE_DELAY_MS`].
    DragEnded,
    /// Short down-only release. Expands a minimized window; no-op otherwise.
    Tap,
}

/// Advance the gesture state machine with one touch event.
///
/// `protected` holds window-local interactive regions; they are translated to
/// screen space using the window position at DOWN time.
pub fn on_touch(
    state: &mut GestureState,
    event: TouchEvent,
    window: &OverlayWindow,
    protected: &[Rect],
    screen: Size,
    now_ms: u64,
) -> GestureOutcome {
    match event.phase {
        TouchPhase::Down => on_down(state, event, window, protected, now_ms),
        TouchPhase::Move => on_move(state, event, window, screen),
        TouchPhase::Up => on_up(state, now_ms),
    }
}

fn on_down(
    state: &mut GestureState,
    event: TouchEvent,
    window: &OverlayWindow,
    protected: &[Rect],
    now_ms: u64,
) -> GestureOutcome {
    if window.visual == VisualState::Minimized {
        // Tap-to-expand shortcut: any touch on the docked strip expands.
        state.reset();
        return GestureOutcome::ExpandShortcut;
    }
    if protected
        .iter()
        .any(|r| r.offset(window.pos).contains(event.raw))
    {
        trace!(x = event.raw.x, y = event.raw.y, "touch_in_protected_region");
        return GestureOutcome::NotHandled;
    }
    state.phase = GesturePhase::Down;
    state.origin_window = window.pos;
    state.origin_touch = event.raw;
    state.started_ms = now_ms;
    GestureOutcome::Consumed
}

fn on_move(
    state: &mut GestureState,
    event: TouchEvent,
    window: &OverlayWindow,
    screen: Size,
) -> GestureOutcome {
    match state.phase {
        GesturePhase::Idle => GestureOutcome::NotHandled,
        GesturePhase::Down => {
            let dx = event.raw.x - state.origin_touch.x;
            let dy = event.raw.y - state.origin_touch.y;
            if dx.abs() <= DRAG_TOLERANCE_PX && dy.abs() <= DRAG_TOLERANCE_PX {
                return GestureOutcome::Consumed;
            }
            state.phase = GesturePhase::Dragging;
            trace!(dx, dy, "drag_started");
            GestureOutcome::Drag(dragged_pos(state, event, window, screen))
        }
        GesturePhase::Dragging => {
            GestureOutcome::Drag(dragged_pos(state, event, window, screen))
        }
    }
}

fn dragged_pos(
    state: &GestureState,
    event: TouchEvent,
    window: &OverlayWindow,
    screen: Size,
) -> Pos {
    let dx = event.raw.x - state.origin_touch.x;
    let dy = event.raw.y - state.origin_touch.y;
    clamp_to_screen(state.origin_window.offset(dx, dy), window.size, screen)
}

fn on_up(state: &mut GestureState, now_ms: u64) -> GestureOutcome {
    let phase = state.phase;
    let pressed_ms = now_ms.saturating_sub(state.started_ms);
    state.reset();
    match phase {
        GesturePhase::Dragging => GestureOutcome::DragEnded,
        GesturePhase::Down if pressed_ms < TAP_MAX_MS => GestureOutcome::Tap,
        _ => GestureOutcome::NotHandled,
    }
}
