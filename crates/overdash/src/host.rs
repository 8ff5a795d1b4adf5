//! Logging implementations of the host collaborator traits.
//!
//! The simulator has no real compositor, so these impls track window state in
//! memory and narrate every call through tracing. They double as a worked
//! example of what a real host integration needs to provide.

use std::collections::HashMap;

use overdash_surface::{
    Compositor, Cue, CuePlayer, Error as SurfaceError, ForegroundKeeper, Pos,
    Result as SurfaceResult, Size, ops::WindowId,
};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

/// In-memory compositor that logs attach/detach/layout calls.
pub struct LoggingCompositor {
    screen: Size,
    attached: Mutex<HashMap<WindowId, Pos>>,
}

impl LoggingCompositor {
    /// Create a compositor with the given simulated screen extent.
    pub fn new(screen: Size) -> Self {
        Self {
            screen,
            attached: Mutex::new(HashMap::new()),
        }
    }
}

impl Compositor for LoggingCompositor {
    fn attach(&self, id: WindowId, pos: Pos) -> SurfaceResult<()> {
        let mut attached = self.attached.lock();
        if attached.contains_key(&id) {
            return Err(SurfaceError::AlreadyAttached(id));
        }
        attached.insert(id, pos);
        info!(id, x = pos.x, y = pos.y, "window attached");
        Ok(())
    }

    fn detach(&self, id: WindowId) -> SurfaceResult<()> {
        match self.attached.lock().remove(&id) {
            Some(_) => {
                info!(id, "window detached");
                Ok(())
            }
            None => Err(SurfaceError::UnknownWindow(id)),
        }
    }

    fn update_layout(&self, id: WindowId, pos: Pos) -> SurfaceResult<()> {
        match self.attached.lock().get_mut(&id) {
            Some(current) => {
                *current = pos;
                trace!(id, x = pos.x, y = pos.y, "layout updated");
                Ok(())
            }
            None => Err(SurfaceError::UnknownWindow(id)),
        }
    }

    fn screen_size(&self) -> Size {
        self.screen
    }
}

/// Foreground keeper that only narrates.
#[derive(Default)]
pub struct LoggingForeground;

impl ForegroundKeeper for LoggingForeground {
    fn acquire(&self) {
        debug!("foreground status acquired");
    }

    fn release(&self) {
        debug!("foreground status released");
    }
}

/// Cue player that only narrates.
#[derive(Default)]
pub struct LoggingCue;

impl CuePlayer for LoggingCue {
    fn play(&self, cue: Cue) {
        info!(?cue, "audio cue");
    }
}
