// Integer screen-space geometry. Overlay coordinates are top-left anchored
// physical pixels; y grows downward, x may go negative while docked off-edge.

use serde::{Deserialize, Serialize};

/// Pixels of a docked window that must stay visible at a screen edge.
pub const EDGE_MARGIN: i32 = 30;

/// Top-left anchor of a window, or a touch point, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pos {
    /// Horizontal coordinate; negative while docked off the left edge.
    pub x: i32,
    /// Vertical coordinate, growing downward.
    pub y: i32,
}

impl Pos {
    /// Construct from coordinates.
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Window or screen extent in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels; zero before the first layout pass.
    pub width: i32,
    /// Height in pixels; zero before the first layout pass.
    pub height: i32,
}

impl Size {
    /// Construct from extents.
    #[inline]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Layout passes report real extents; zero means "not measured yet".
    #[inline]
    pub fn is_measured(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Construct from a top-left anchor and extents.
    #[inline]
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }
    /// Right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }
    /// Top edge.
    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }
    /// Bottom edge (`y + h`).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Inclusive containment check.
    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Translate by a window origin, mapping a window-local rect to screen space.
    #[inline]
    pub fn offset(&self, origin: Pos) -> Self {
        Self {
            x: self.x + origin.x,
            y: self.y + origin.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Constrain a window position to screen bounds.
///
/// Horizontally the window may hang off either edge as long as an
/// `EDGE_MARGIN` strip stays on screen (that strip is the touch target of a
/// docked window). Vertically the window stays fully on screen.
#[inline]
pub fn clamp_to_screen(pos: Pos, size: Size, screen: Size) -> Pos {
    Pos {
        x: (-size.width + EDGE_MARGIN).max((screen.width - EDGE_MARGIN).min(pos.x)),
        y: 0.max((screen.height - size.height).min(pos.y)),
    }
}
