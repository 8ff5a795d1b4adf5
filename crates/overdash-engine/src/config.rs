use overdash_surface::{Pos, Rect};
use serde::{Deserialize, Serialize};

/// Engine configuration supplied by the host at spawn time.
///
/// Timing tolerances, animation duration, and edge margins are fixed named
/// constants in their modules, not configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Window position when a fresh instance attaches.
    pub initial_pos: Pos,
    /// Window-local interactive regions the gesture classifier must not
    /// capture (buttons, inputs, selectors).
    pub protected: Vec<Rect>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            initial_pos: Pos::new(50, 200),
            protected: Vec::new(),
        }
    }
}
