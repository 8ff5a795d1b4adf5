//! Host collaborator traits and their test doubles.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    Result as SurfaceResult,
    error::Error,
    geom::{Pos, Size},
};

/// Identifier the controller assigns to each overlay window it creates.
pub type WindowId = u64;

/// Window-compositing surface provided by the host.
///
/// The controller is the only caller and already serializes its calls, so
/// implementations do not need internal ordering guarantees beyond thread
/// safety.
pub trait Compositor: Send + Sync {
    /// Composite a new window at `pos`, above all other content.
    fn attach(&self, id: WindowId, pos: Pos) -> SurfaceResult<()>;
    /// Remove the window from the compositor.
    fn detach(&self, id: WindowId) -> SurfaceResult<()>;
    /// Reposition an attached window.
    fn update_layout(&self, id: WindowId, pos: Pos) -> SurfaceResult<()>;
    /// Full screen extent in pixels.
    fn screen_size(&self) -> Size;
}

/// Keeps the host process eligible to draw over other apps while the overlay
/// is up. Both calls are best-effort; the host logs its own failures.
pub trait ForegroundKeeper: Send + Sync {
    /// Claim draw-over-apps eligibility.
    fn acquire(&self);
    /// Give the eligibility back.
    fn release(&self);
}

/// Audio cues the controller can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// A delivery session finished and its record was emitted.
    SessionCompleted,
}

/// Plays short audio cues. Fire-and-forget.
pub trait CuePlayer: Send + Sync {
    /// Request one cue.
    fn play(&self, cue: Cue);
}

/// Mock compositor for tests: records calls, tracks attached windows, and can
/// be told to fail.
#[derive(Clone, Default)]
pub struct MockCompositor {
    calls: Arc<Mutex<Vec<String>>>,
    attached: Arc<Mutex<HashMap<WindowId, Pos>>>,
    layouts: Arc<Mutex<Vec<(WindowId, Pos)>>>,
    screen: Arc<Mutex<Size>>,
    fail_attach: Arc<AtomicBool>,
    fail_detach: Arc<AtomicBool>,
    max_attached: Arc<AtomicUsize>,
}

impl MockCompositor {
    /// Mock with a 1080x1920 screen.
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.screen.lock() = Size::new(1080, 1920);
        mock
    }

    /// Override the reported screen extent.
    pub fn set_screen_size(&self, size: Size) {
        *self.screen.lock() = size;
    }

    /// Make subsequent attach calls fail.
    pub fn set_fail_attach(&self, v: bool) {
        self.fail_attach.store(v, Ordering::SeqCst);
    }

    /// Make subsequent detach calls fail.
    pub fn set_fail_detach(&self, v: bool) {
        self.fail_detach.store(v, Ordering::SeqCst);
    }

    /// Whether the named call was recorded.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    /// Number of windows currently attached.
    pub fn attached_count(&self) -> usize {
        self.attached.lock().len()
    }

    /// High-water mark of simultaneously attached windows.
    pub fn max_attached(&self) -> usize {
        self.max_attached.load(Ordering::SeqCst)
    }

    /// Current position of an attached window.
    pub fn window_pos(&self, id: WindowId) -> Option<Pos> {
        self.attached.lock().get(&id).copied()
    }

    /// All layout updates applied so far, oldest first.
    pub fn layouts(&self) -> Vec<(WindowId, Pos)> {
        self.layouts.lock().clone()
    }

    /// Total layout updates applied so far.
    pub fn layout_count(&self) -> usize {
        self.layouts.lock().len()
    }

    fn note(&self, s: &str) {
        self.calls.lock().push(s.to_string());
    }
}

impl Compositor for MockCompositor {
    fn attach(&self, id: WindowId, pos: Pos) -> SurfaceResult<()> {
        self.note("attach");
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(Error::AttachRejected("mock failure".into()));
        }
        let mut attached = self.attached.lock();
        if attached.contains_key(&id) {
            return Err(Error::AlreadyAttached(id));
        }
        attached.insert(id, pos);
        let count = attached.len();
        self.max_attached.fetch_max(count, Ordering::SeqCst);
        Ok(())
    }

    fn detach(&self, id: WindowId) -> SurfaceResult<()> {
        self.note("detach");
        if self.fail_detach.load(Ordering::SeqCst) {
            return Err(Error::UnknownWindow(id));
        }
        match self.attached.lock().remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownWindow(id)),
        }
    }

    fn update_layout(&self, id: WindowId, pos: Pos) -> SurfaceResult<()> {
        let mut attached = self.attached.lock();
        match attached.get_mut(&id) {
            Some(current) => {
                *current = pos;
                self.layouts.lock().push((id, pos));
                Ok(())
            }
            None => Err(Error::UnknownWindow(id)),
        }
    }

    fn screen_size(&self) -> Size {
        *self.screen.lock()
    }
}

/// Mock foreground keeper counting acquire/release pairs.
#[derive(Clone, Default)]
pub struct MockForeground {
    acquires: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
}

impl MockForeground {
    /// Mock with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of acquire calls seen.
    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Number of release calls seen.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// True while more acquires than releases have been seen.
    pub fn held(&self) -> bool {
        self.acquires() > self.releases()
    }
}

impl ForegroundKeeper for MockForeground {
    fn acquire(&self) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock cue player recording every request.
#[derive(Clone, Default)]
pub struct MockCuePlayer {
    played: Arc<Mutex<Vec<Cue>>>,
}

impl MockCuePlayer {
    /// Mock with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cue requested so far, oldest first.
    pub fn played(&self) -> Vec<Cue> {
        self.played.lock().clone()
    }

    /// Number of cues requested.
    pub fn count(&self) -> usize {
        self.played.lock().len()
    }
}

impl CuePlayer for MockCuePlayer {
    fn play(&self, cue: Cue) {
        self.played.lock().push(cue);
    }
}
