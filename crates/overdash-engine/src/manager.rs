//! Overlay lifecycle manager.
//!
//! A single actor task owns the only live overlay instance and serializes
//! every controller entry point through its command queue: host commands,
//! touch events, layout reports, session operations, and the delayed internal
//! messages (settle, measure retry, animation frames, session ticks) that
//! re-enter the controller. Delayed messages carry the instance generation
//! and are dropped when stale, so a retired instance can never be mutated by
//! a leftover timer.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use overdash_protocol::{NotifyKind, ipc::HostTx};
use overdash_surface::{
    Compositor, Cue, CuePlayer, ForegroundKeeper, Pos, Size, TouchEvent, clamp_to_screen,
};
use permissions::PermissionOracle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::{
    clock::Clock,
    config::OverlayConfig,
    error::{Error, Result},
    gesture::{self, GestureOutcome, GestureState, SETTLE_DELAY_MS},
    notify::HostNotifier,
    session::{DeliverySession, SESSION_TICK_MS, SessionStatus, format_elapsed},
    snap::{self, FRAME_MS, MEASURE_RETRY_MS, SnapAnimation, SnapKind},
    ticker::{STOP_WAIT_TIMEOUT_MS, Ticker},
    window::{OverlayWindow, VisualState},
};

/// Ticker id for the in-flight snap animation frames.
const FRAME_TICKER: &str = "frame";
/// Ticker id for the per-second session elapsed updates.
const SESSION_TICKER: &str = "session";

/// Host collaborators the controller is constructed over.
pub struct Deps {
    /// Window-compositing surface.
    pub compositor: Arc<dyn Compositor>,
    /// Foreground-status keeper held while the overlay is up.
    pub foreground: Arc<dyn ForegroundKeeper>,
    /// Audio cues for session completion.
    pub cues: Arc<dyn CuePlayer>,
    /// Draw-over-apps permission oracle.
    pub permissions: Arc<dyn PermissionOracle>,
    /// Wall clock for session timestamps.
    pub clock: Arc<dyn Clock>,
}

/// Snapshot of controller state for hosts and tests.
#[derive(Clone, Copy, Debug)]
pub struct ControllerStatus {
    /// Whether an instance is live.
    pub running: bool,
    /// The live instance's window, if any.
    pub window: Option<OverlayWindow>,
    /// Session progress; idle when not running.
    pub session: SessionStatus,
}

enum Command {
    Show {
        respond: oneshot::Sender<Result<()>>,
    },
    Hide {
        respond: oneshot::Sender<Result<()>>,
    },
    Stop {
        respond: oneshot::Sender<Result<()>>,
    },
    Move {
        x: i32,
        y: i32,
        respond: oneshot::Sender<Result<()>>,
    },
    Touch {
        event: TouchEvent,
        respond: oneshot::Sender<bool>,
    },
    ReportLayout {
        size: Size,
    },
    StartSession {
        service: String,
        respond: oneshot::Sender<Result<()>>,
    },
    SelectService {
        service: String,
        respond: oneshot::Sender<Result<()>>,
    },
    FinishSession {
        reward: String,
        estimated_minutes: String,
        distance: String,
        respond: oneshot::Sender<Result<()>>,
    },
    Status {
        respond: oneshot::Sender<ControllerStatus>,
    },
    // Delayed internal messages, generation-stamped.
    Settle {
        generation: u64,
    },
    SnapRetry {
        kind: SnapKind,
        generation: u64,
    },
    Frame {
        generation: u64,
    },
    SessionTick {
        generation: u64,
    },
}

/// Cheap, clonable handle to the controller task.
#[derive(Clone)]
pub struct OverlayHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl OverlayHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(make(tx)).map_err(|_| Error::ChannelClosed)?;
        rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Show the overlay. No-op success when already running.
    pub async fn show(&self) -> Result<()> {
        self.request(|respond| Command::Show { respond }).await?
    }

    /// Hide the overlay. No-op success when not running.
    pub async fn hide(&self) -> Result<()> {
        self.request(|respond| Command::Hide { respond }).await?
    }

    /// Hide the overlay and signal the host not to restart it.
    pub async fn stop(&self) -> Result<()> {
        self.request(|respond| Command::Stop { respond }).await?
    }

    /// Move the overlay window to an absolute position.
    pub async fn move_to(&self, x: i32, y: i32) -> Result<()> {
        self.request(|respond| Command::Move { x, y, respond }).await?
    }

    /// Feed one touch event; returns whether the controller consumed it.
    pub async fn touch(&self, event: TouchEvent) -> bool {
        self.request(|respond| Command::Touch { event, respond })
            .await
            .unwrap_or(false)
    }

    /// Report the window's measured size from the host's layout pass.
    pub fn report_layout(&self, size: Size) {
        let _ = self.tx.send(Command::ReportLayout { size });
    }

    /// Start a delivery session for `service`.
    pub async fn start_session(&self, service: &str) -> Result<()> {
        let service = service.to_string();
        self.request(|respond| Command::StartSession { service, respond })
            .await?
    }

    /// Update the in-progress session's service.
    pub async fn select_service(&self, service: &str) -> Result<()> {
        let service = service.to_string();
        self.request(|respond| Command::SelectService { service, respond })
            .await?
    }

    /// Finish the in-progress session, emitting its record on success.
    pub async fn finish_session(
        &self,
        reward: &str,
        estimated_minutes: &str,
        distance: &str,
    ) -> Result<()> {
        let (reward, estimated_minutes, distance) = (
            reward.to_string(),
            estimated_minutes.to_string(),
            distance.to_string(),
        );
        self.request(|respond| Command::FinishSession {
            reward,
            estimated_minutes,
            distance,
            respond,
        })
        .await?
    }

    /// Snapshot of the controller's current state.
    pub async fn status(&self) -> Result<ControllerStatus> {
        self.request(|respond| Command::Status { respond }).await
    }
}

/// Constructor for the controller task.
pub struct OverlayController;

impl OverlayController {
    /// Spawn the manager task and return a handle to it.
    pub fn spawn(deps: Deps, config: OverlayConfig, host_tx: HostTx) -> OverlayHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let manager = Manager {
            deps,
            config,
            notifier: HostNotifier::new(host_tx),
            ticker: Ticker::new(),
            tx: tx.clone(),
            instance: None,
            next_generation: 0,
        };
        tokio::spawn(manager.run(rx));
        OverlayHandle { tx }
    }
}

/// State owned by one live overlay instance.
struct Instance {
    /// Generation stamp; doubles as the compositor window id.
    generation: u64,
    window: OverlayWindow,
    gesture: GestureState,
    session: DeliverySession,
    animation: Option<SnapAnimation>,
}

/// The actor behind [`OverlayHandle`]. Exclusive owner of the singleton
/// instance; nothing outside `run` touches it.
struct Manager {
    deps: Deps,
    config: OverlayConfig,
    notifier: HostNotifier,
    ticker: Ticker,
    /// Loopback sender for delayed internal messages.
    tx: mpsc::UnboundedSender<Command>,
    instance: Option<Instance>,
    next_generation: u64,
}

impl Manager {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            self.handle(cmd).await;
        }
        // Handle dropped: tear down whatever is still up.
        if let Some(inst) = self.instance.take() {
            self.retire(inst).await;
        }
        debug!("controller_task_exit");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Show { respond } => {
                let _ = respond.send(self.show().await);
            }
            Command::Hide { respond } => {
                let _ = respond.send(self.hide(false).await);
            }
            Command::Stop { respond } => {
                let _ = respond.send(self.hide(true).await);
            }
            Command::Move { x, y, respond } => {
                let _ = respond.send(self.move_to(x, y));
            }
            Command::Touch { event, respond } => {
                let _ = respond.send(self.touch(event));
            }
            Command::ReportLayout { size } => self.report_layout(size),
            Command::StartSession { service, respond } => {
                let _ = respond.send(self.start_session(&service));
            }
            Command::SelectService { service, respond } => {
                let _ = respond.send(self.select_service(&service));
            }
            Command::FinishSession {
                reward,
                estimated_minutes,
                distance,
                respond,
            } => {
                let _ = respond.send(self.finish_session(&reward, &estimated_minutes, &distance));
            }
            Command::Status { respond } => {
                let _ = respond.send(self.status());
            }
            Command::Settle { generation } => {
                if self.is_current(generation) {
                    self.begin_snap(SnapKind::Dock);
                }
            }
            Command::SnapRetry { kind, generation } => {
                if self.is_current(generation) {
                    self.begin_snap(kind);
                }
            }
            Command::Frame { generation } => self.on_frame(generation),
            Command::SessionTick { generation } => self.on_session_tick(generation),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.instance
            .as_ref()
            .is_some_and(|i| i.generation == generation)
    }

    // ---- lifecycle ----

    async fn show(&mut self) -> Result<()> {
        if self.instance.is_some() {
            debug!("show_noop_already_running");
            return Ok(());
        }
        if !self.deps.permissions.overlay_ok() {
            return Err(Error::PermissionDenied);
        }
        // A previous instance's tasks must be fully drained before a new
        // window may appear: never two attached windows.
        self.drain_tickers().await;

        self.next_generation += 1;
        let generation = self.next_generation;
        let mut window = OverlayWindow::new(self.config.initial_pos);
        self.deps.foreground.acquire();
        if let Err(e) = self.deps.compositor.attach(generation, window.pos) {
            self.deps.foreground.release();
            warn!(generation, error = %e, "overlay_attach_failed");
            return Err(Error::AttachFailed(e));
        }
        window.attached = true;
        self.instance = Some(Instance {
            generation,
            window,
            gesture: GestureState::default(),
            session: DeliverySession::default(),
            animation: None,
        });
        info!(generation, "overlay_shown");
        Ok(())
    }

    async fn hide(&mut self, stop: bool) -> Result<()> {
        let Some(inst) = self.instance.take() else {
            debug!(stop, "hide_noop_not_running");
            return Ok(());
        };
        let generation = inst.generation;
        self.retire(inst).await;
        info!(generation, stop, "overlay_hidden");
        Ok(())
    }

    /// Tear an instance down: detach, release foreground, drain tickers.
    /// Best-effort throughout; retirement never fails the caller.
    async fn retire(&mut self, mut inst: Instance) {
        inst.animation = None;
        if inst.window.attached
            && let Err(e) = self.deps.compositor.detach(inst.generation)
        {
            warn!(generation = inst.generation, error = %e, "overlay_detach_failed");
        }
        self.deps.foreground.release();
        self.drain_tickers().await;
    }

    /// Cancel all tickers and await completion with a bounded wait. A timeout
    /// is non-fatal but risks transient double-window visibility, so it is
    /// logged loudly and surfaced to the host.
    async fn drain_tickers(&self) {
        if !self
            .ticker
            .clear_wait(Duration::from_millis(STOP_WAIT_TIMEOUT_MS))
            .await
        {
            warn!("retire_timeout: instance tasks did not confirm teardown");
            let _ = self.notifier.send_notification(
                NotifyKind::Warn,
                "Overlay",
                "previous overlay did not fully retire".to_string(),
            );
        }
    }

    // ---- window position ----

    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        let screen = self.deps.compositor.screen_size();
        let Some(inst) = self.instance.as_mut() else {
            debug!("move_noop_not_running");
            return Ok(());
        };
        // Clamping needs a real size; apply raw before the first layout pass.
        let pos = if inst.window.is_measured() {
            clamp_to_screen(Pos::new(x, y), inst.window.size, screen)
        } else {
            Pos::new(x, y)
        };
        Self::apply_layout(&self.deps, inst, pos);
        Ok(())
    }

    /// Mutate the window position and push it to the compositor. Compositor
    /// rejections here are logged and ignored (the window may be mid-detach).
    fn apply_layout(deps: &Deps, inst: &mut Instance, pos: Pos) {
        inst.window.pos = pos;
        if let Err(e) = deps.compositor.update_layout(inst.generation, pos) {
            warn!(generation = inst.generation, error = %e, "layout_update_failed");
        }
    }

    fn report_layout(&mut self, size: Size) {
        let screen = self.deps.compositor.screen_size();
        let Some(inst) = self.instance.as_mut() else {
            return;
        };
        if !size.is_measured() {
            return;
        }
        inst.window.size = size;
        trace!(w = size.width, h = size.height, "layout_measured");
        // The clamp invariant starts holding as soon as a real size exists.
        let clamped = clamp_to_screen(inst.window.pos, size, screen);
        if clamped != inst.window.pos {
            Self::apply_layout(&self.deps, inst, clamped);
        }
    }

    // ---- gestures ----

    fn touch(&mut self, event: TouchEvent) -> bool {
        let Some(inst) = self.instance.as_mut() else {
            return false;
        };
        let screen = self.deps.compositor.screen_size();
        let now = self.deps.clock.now_ms();
        let outcome = gesture::on_touch(
            &mut inst.gesture,
            event,
            &inst.window,
            &self.config.protected,
            screen,
            now,
        );
        match outcome {
            GestureOutcome::NotHandled => false,
            GestureOutcome::Consumed => true,
            GestureOutcome::ExpandShortcut => {
                self.begin_snap(SnapKind::Expand);
                true
            }
            GestureOutcome::Drag(pos) => {
                // A finger overrides any animation in flight.
                if inst.animation.take().is_some() {
                    self.ticker.stop(FRAME_TICKER);
                }
                Self::apply_layout(&self.deps, inst, pos);
                true
            }
            GestureOutcome::DragEnded => {
                let generation = inst.generation;
                self.schedule(SETTLE_DELAY_MS, Command::Settle { generation });
                true
            }
            GestureOutcome::Tap => {
                if inst.window.visual == VisualState::Minimized {
                    self.begin_snap(SnapKind::Expand);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Send `cmd` back to ourselves after `delay_ms`.
    fn schedule(&self, delay_ms: u64, cmd: Command) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            let _ = tx.send(cmd);
        });
    }

    // ---- snap animation ----

    fn begin_snap(&mut self, kind: SnapKind) {
        let screen = self.deps.compositor.screen_size();
        let Some(inst) = self.instance.as_mut() else {
            return;
        };
        if !inst.window.attached {
            return;
        }
        let generation = inst.generation;
        if !inst.window.is_measured() {
            trace!(?kind, "snap_waiting_for_measure");
            self.schedule(MEASURE_RETRY_MS, Command::SnapRetry { kind, generation });
            return;
        }
        let target = match kind {
            SnapKind::Dock => snap::dock_target_x(&inst.window, screen),
            SnapKind::Expand => snap::expand_target_x(&inst.window, screen),
        };
        debug!(?kind, from = inst.window.pos.x, target, "snap_started");
        // Replaces any animation already in flight.
        inst.animation = Some(SnapAnimation::new(
            kind,
            inst.window.pos.x,
            target,
            Instant::now(),
        ));
        let tx = self.tx.clone();
        self.ticker.start(
            FRAME_TICKER,
            Duration::from_millis(FRAME_MS),
            Duration::from_millis(FRAME_MS),
            move || {
                let _ = tx.send(Command::Frame { generation });
            },
        );
    }

    fn on_frame(&mut self, generation: u64) {
        let screen = self.deps.compositor.screen_size();
        let Some(inst) = self.instance.as_mut() else {
            self.ticker.stop(FRAME_TICKER);
            return;
        };
        if inst.generation != generation {
            return;
        }
        let Some(anim) = inst.animation else {
            self.ticker.stop(FRAME_TICKER);
            return;
        };
        if !inst.window.attached {
            // Never apply layout to a detached window.
            inst.animation = None;
            self.ticker.stop(FRAME_TICKER);
            return;
        }
        let (x, done) = anim.sample(Instant::now());
        let pos = clamp_to_screen(Pos::new(x, inst.window.pos.y), inst.window.size, screen);
        Self::apply_layout(&self.deps, inst, pos);
        if done {
            inst.window.visual = anim.end_state();
            inst.animation = None;
            self.ticker.stop(FRAME_TICKER);
            debug!(visual = ?inst.window.visual, x = pos.x, "snap_finished");
        }
    }

    // ---- session ----

    fn start_session(&mut self, service: &str) -> Result<()> {
        let Some(inst) = self.instance.as_mut() else {
            return Err(Error::SessionNotRunning);
        };
        let now = self.deps.clock.now_ms();
        inst.session.start(service, now)?;
        let generation = inst.generation;
        self.notifier.send_elapsed(format_elapsed(0))?;
        self.notifier.send_notification(
            NotifyKind::Info,
            "Delivery",
            format!("session started for {service}"),
        )?;
        let tx = self.tx.clone();
        self.ticker.start(
            SESSION_TICKER,
            Duration::from_millis(SESSION_TICK_MS),
            Duration::from_millis(SESSION_TICK_MS),
            move || {
                let _ = tx.send(Command::SessionTick { generation });
            },
        );
        Ok(())
    }

    fn select_service(&mut self, service: &str) -> Result<()> {
        let Some(inst) = self.instance.as_mut() else {
            return Err(Error::SessionNotRunning);
        };
        inst.session.select_service(service);
        Ok(())
    }

    fn on_session_tick(&mut self, generation: u64) {
        let now = self.deps.clock.now_ms();
        let Some(inst) = self.instance.as_mut() else {
            self.ticker.stop(SESSION_TICKER);
            return;
        };
        if inst.generation != generation {
            return;
        }
        if inst.session.status() != SessionStatus::InProgress {
            self.ticker.stop(SESSION_TICKER);
            return;
        }
        let _ = self.notifier.send_elapsed(inst.session.elapsed_display(now));
    }

    fn finish_session(
        &mut self,
        reward: &str,
        estimated_minutes: &str,
        distance: &str,
    ) -> Result<()> {
        let Some(inst) = self.instance.as_mut() else {
            return Err(Error::SessionNotRunning);
        };
        let now = self.deps.clock.now_ms();
        let final_display = inst.session.elapsed_display(now);
        let record = match inst.session.finish(reward, estimated_minutes, distance, now) {
            Ok(record) => record,
            Err(err) => {
                if let Error::ValidationFailed { field } = &err {
                    let _ = self.notifier.send_notification(
                        NotifyKind::Error,
                        "Delivery",
                        format!("{field} is required to finish a session"),
                    );
                }
                return Err(err);
            }
        };
        self.ticker.stop(SESSION_TICKER);
        self.notifier.send_session_completed(record)?;
        self.notifier.send_elapsed(final_display)?;
        self.notifier.send_elapsed(format_elapsed(0))?;
        self.deps.cues.play(Cue::SessionCompleted);
        self.notifier.send_notification(
            NotifyKind::Success,
            "Delivery",
            "session saved".to_string(),
        )?;
        Ok(())
    }

    fn status(&self) -> ControllerStatus {
        ControllerStatus {
            running: self.instance.is_some(),
            window: self.instance.as_ref().map(|i| i.window),
            session: self
                .instance
                .as_ref()
                .map(|i| i.session.status())
                .unwrap_or_default(),
        }
    }
}
