//! Edge-snap and expand animations.
//!
//! An animation is an explicit task `{from, target, started, duration}`
//! sampled by frame ticks from the manager; completion is the state check
//! `fraction >= 1.0`. Target selection needs a measured width, so callers
//! retry while the window is unmeasured.

use std::time::{Duration, Instant};

use overdash_surface::{EDGE_MARGIN, Size};

use crate::window::{OverlayWindow, VisualState};

/// Duration of the snap/expand interpolation.
pub const SNAP_ANIM_MS: u64 = 300;

/// Frame tick interval while an animation is in flight.
pub const FRAME_MS: u64 = 16;

/// Horizontal inset from the screen edge for an expanded window.
pub const EXPAND_INSET: i32 = 20;

/// Retry interval while waiting for the window's first measurement.
pub const MEASURE_RETRY_MS: u64 = 100;

/// Which resting position an animation is heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapKind {
    /// Minimize against the nearest screen edge.
    Dock,
    /// Expand to the full position on the side the window is docked.
    Expand,
}

/// Target x for docking: the nearest edge, leaving [`EDGE_MARGIN`] visible.
pub fn dock_target_x(window: &OverlayWindow, screen: Size) -> i32 {
    if window.center_x() < screen.width / 2 {
        -window.size.width + EDGE_MARGIN
    } else {
        screen.width - EDGE_MARGIN
    }
}

/// Target x for expansion, based on which side the window is docked.
pub fn expand_target_x(window: &OverlayWindow, screen: Size) -> i32 {
    if window.pos.x < 0 {
        EXPAND_INSET
    } else {
        screen.width - window.size.width - EXPAND_INSET
    }
}

/// One in-flight horizontal animation. At most one exists per window; a new
/// request replaces the previous one wholesale.
#[derive(Clone, Copy, Debug)]
pub struct SnapAnimation {
    kind: SnapKind,
    from_x: i32,
    target_x: i32,
    started: Instant,
    duration: Duration,
}

impl SnapAnimation {
    /// Start an animation from `from_x` toward `target_x` at `now`.
    pub fn new(kind: SnapKind, from_x: i32, target_x: i32, now: Instant) -> Self {
        Self {
            kind,
            from_x,
            target_x,
            started: now,
            duration: Duration::from_millis(SNAP_ANIM_MS),
        }
    }

    /// Linear sample at `now`: the x to apply and whether the animation is done.
    pub fn sample(&self, now: Instant) -> (i32, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        let fraction = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        if fraction >= 1.0 {
            return (self.target_x, true);
        }
        let x = self.from_x + ((self.target_x - self.from_x) as f32 * fraction) as i32;
        (x, false)
    }

    /// Visual state the window enters when this animation completes.
    pub fn end_state(&self) -> VisualState {
        match self.kind {
            SnapKind::Dock => VisualState::Minimized,
            SnapKind::Expand => VisualState::Expanded,
        }
    }
}

#[cfg(test)]
mod tests {
    use overdash_surface::Pos;

    use super::*;

    const SCREEN: Size = Size {
        width: 1080,
        height: 1920,
    };

    fn window_at(x: i32) -> OverlayWindow {
        let mut w = OverlayWindow::new(Pos::new(x, 200));
        w.size = Size::new(300, 400);
        w
    }

    #[test]
    fn dock_picks_the_nearest_edge() {
        // Center at 350 < 540: left edge, 30px visible.
        assert_eq!(dock_target_x(&window_at(200), SCREEN), -270);
        // Center at 750 >= 540: right edge.
        assert_eq!(dock_target_x(&window_at(600), SCREEN), 1050);
        // Exactly mid-screen center docks right.
        assert_eq!(dock_target_x(&window_at(390), SCREEN), 1050);
    }

    #[test]
    fn expand_returns_to_the_docked_side() {
        assert_eq!(expand_target_x(&window_at(-270), SCREEN), 20);
        assert_eq!(expand_target_x(&window_at(1050), SCREEN), 760);
    }

    #[test]
    fn sample_interpolates_linearly_and_completes() {
        let start = Instant::now();
        let anim = SnapAnimation::new(SnapKind::Dock, 0, 300, start);

        let (x, done) = anim.sample(start);
        assert_eq!((x, done), (0, false));

        let (x, done) = anim.sample(start + Duration::from_millis(150));
        assert!(!done);
        assert!((145..=155).contains(&x), "halfway sample was {x}");

        let (x, done) = anim.sample(start + Duration::from_millis(SNAP_ANIM_MS));
        assert_eq!((x, done), (300, true));
        // Past the end stays pinned at the target.
        let (x, done) = anim.sample(start + Duration::from_millis(1000));
        assert_eq!((x, done), (300, true));
    }

    #[test]
    fn end_state_matches_kind() {
        let now = Instant::now();
        assert_eq!(
            SnapAnimation::new(SnapKind::Dock, 0, 1, now).end_state(),
            VisualState::Minimized
        );
        assert_eq!(
            SnapAnimation::new(SnapKind::Expand, 0, 1, now).end_state(),
            VisualState::Expanded
        );
    }
}
