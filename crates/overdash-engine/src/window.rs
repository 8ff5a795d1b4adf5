//! Overlay window state owned by a live instance.

use overdash_surface::{Pos, Size};

/// Expanded/minimized visual state of the overlay.
///
/// Mutated only by the snap animator on animation completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
    /// Fully visible, usable form.
    Expanded,
    /// Docked at a screen edge with only a touch target showing.
    Minimized,
}

/// The single overlay window an instance composites.
#[derive(Clone, Copy, Debug)]
pub struct OverlayWindow {
    /// Top-left anchor in screen pixels.
    pub pos: Pos,
    /// Measured extent; zero until the host's first layout pass reports it.
    pub size: Size,
    /// Current visual state; starts expanded.
    pub visual: VisualState,
    /// Whether the window is currently composited.
    pub attached: bool,
}

impl OverlayWindow {
    /// A new, not-yet-attached window at `pos`.
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            size: Size::default(),
            visual: VisualState::Expanded,
            attached: false,
        }
    }

    /// Whether the host has reported a real size yet.
    pub fn is_measured(&self) -> bool {
        self.size.is_measured()
    }

    /// Horizontal center in screen pixels. Meaningless before measurement.
    pub fn center_x(&self) -> i32 {
        self.pos.x + self.size.width / 2
    }
}
