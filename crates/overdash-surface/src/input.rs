use serde::{Deserialize, Serialize};

use crate::geom::Pos;

/// Phase of a touch event within one pointer sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Pointer made contact.
    Down,
    /// Pointer moved while in contact.
    Move,
    /// Pointer lifted, ending the sequence.
    Up,
}

/// One touch event as delivered by the host's window surface.
///
/// `raw` is the pointer position in absolute screen coordinates; `local` is
/// the same pointer relative to the overlay window's top-left corner. Hosts
/// deliver both because interactive-region hit testing happens in screen
/// space while the window itself only knows local layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase within the pointer sequence.
    pub phase: TouchPhase,
    /// Pointer position in absolute screen coordinates.
    pub raw: Pos,
    /// Pointer position relative to the window's top-left corner.
    pub local: Pos,
}

impl TouchEvent {
    /// Construct a touch event from parts.
    pub fn new(phase: TouchPhase, raw: Pos, local: Pos) -> Self {
        Self { phase, raw, local }
    }
}
