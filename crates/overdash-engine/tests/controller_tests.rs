//! End-to-end controller tests over mock collaborators.

use std::{sync::Arc, time::Duration};

use overdash_engine::{
    Deps, Error, ManualClock, OverlayConfig, OverlayController, OverlayHandle, SessionStatus,
    VisualState,
    test_support::{drain, recv_until, wait_status_until},
};
use overdash_protocol::{MsgToHost, ipc, ipc::HostRx};
use overdash_surface::{
    Pos, Rect, Size, TouchEvent, TouchPhase,
    ops::{MockCompositor, MockCuePlayer, MockForeground},
};
use permissions::{Denied, Granted, PermissionOracle};

/// Everything a test needs to drive the controller and observe its effects.
struct Harness {
    handle: OverlayHandle,
    rx: HostRx,
    comp: MockCompositor,
    fg: MockForeground,
    cues: MockCuePlayer,
    clock: Arc<ManualClock>,
}

fn spawn_with(config: OverlayConfig, oracle: Arc<dyn PermissionOracle>) -> Harness {
    let comp = MockCompositor::new();
    let fg = MockForeground::new();
    let cues = MockCuePlayer::new();
    let clock = Arc::new(ManualClock::new(1000));
    let deps = Deps {
        compositor: Arc::new(comp.clone()),
        foreground: Arc::new(fg.clone()),
        cues: Arc::new(cues.clone()),
        permissions: oracle,
        clock: clock.clone(),
    };
    let (tx, rx) = ipc::host_channel();
    let handle = OverlayController::spawn(deps, config, tx);
    Harness {
        handle,
        rx,
        comp,
        fg,
        cues,
        clock,
    }
}

fn spawn_controller() -> Harness {
    spawn_with(OverlayConfig::default(), Arc::new(Granted))
}

fn touch(phase: TouchPhase, x: i32, y: i32) -> TouchEvent {
    TouchEvent::new(phase, Pos::new(x, y), Pos::new(0, 0))
}

/// Show the overlay and report a measured 300x400 window.
async fn show_measured(h: &Harness) {
    h.handle.show().await.expect("show");
    h.handle.report_layout(Size::new(300, 400));
    // A round-trip guarantees the layout report has been processed.
    let status = h.handle.status().await.expect("status");
    assert!(status.running);
}

#[tokio::test(flavor = "multi_thread")]
async fn show_is_idempotent() {
    let h = spawn_controller();
    h.handle.show().await.expect("first show");
    h.handle.show().await.expect("second show");
    assert_eq!(h.comp.attached_count(), 1);
    assert_eq!(h.comp.max_attached(), 1);
    assert!(h.fg.held());
}

#[tokio::test(flavor = "multi_thread")]
async fn hide_is_idempotent() {
    let h = spawn_controller();
    h.handle.hide().await.expect("hide while hidden");
    h.handle.show().await.expect("show");
    h.handle.hide().await.expect("hide");
    h.handle.hide().await.expect("second hide");
    assert_eq!(h.comp.attached_count(), 0);
    assert!(!h.fg.held());
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_tears_down_like_hide() {
    let h = spawn_controller();
    h.handle.show().await.expect("show");
    h.handle.stop().await.expect("stop");
    let status = h.handle.status().await.expect("status");
    assert!(!status.running);
    assert_eq!(h.comp.attached_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn show_without_permission_fails() {
    let h = spawn_with(OverlayConfig::default(), Arc::new(Denied));
    assert!(matches!(h.handle.show().await, Err(Error::PermissionDenied)));
    assert_eq!(h.comp.attached_count(), 0);
    // Foreground status is never touched before the permission gate.
    assert_eq!(h.fg.acquires(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_attach_rolls_back_to_stopped() {
    let h = spawn_controller();
    h.comp.set_fail_attach(true);
    assert!(matches!(h.handle.show().await, Err(Error::AttachFailed(_))));
    let status = h.handle.status().await.expect("status");
    assert!(!status.running);
    assert!(!h.fg.held());

    // Recoverable: the next show succeeds once the compositor cooperates.
    h.comp.set_fail_attach(false);
    h.handle.show().await.expect("show after recovery");
    assert_eq!(h.comp.attached_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_shows_attach_exactly_one_window() {
    let h = spawn_controller();
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let handle = h.handle.clone();
        tasks.push(tokio::spawn(async move { handle.show().await }));
    }
    for t in tasks {
        t.await.expect("join").expect("show");
    }
    assert_eq!(h.comp.attached_count(), 1);
    assert_eq!(h.comp.max_attached(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn show_hide_cycles_never_overlap_windows() {
    let h = spawn_controller();
    for _ in 0..5 {
        h.handle.show().await.expect("show");
        h.handle.hide().await.expect("hide");
    }
    assert_eq!(h.comp.max_attached(), 1);
    assert_eq!(h.comp.attached_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn move_is_clamped_once_measured() {
    let h = spawn_controller();
    h.handle.move_to(9000, 9000).await.expect("move while hidden");
    h.handle.show().await.expect("show");

    // Before measurement the position is applied raw.
    h.handle.move_to(9000, 9000).await.expect("raw move");
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.window.map(|w| w.pos), Some(Pos::new(9000, 9000)));

    // Reporting a size clamps the stored position immediately.
    h.handle.report_layout(Size::new(300, 400));
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.window.map(|w| w.pos), Some(Pos::new(1050, 1520)));

    h.handle.move_to(-9000, -9000).await.expect("clamped move");
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.window.map(|w| w.pos), Some(Pos::new(-270, 0)));
}

#[tokio::test(flavor = "multi_thread")]
async fn drag_then_release_docks_to_the_near_edge() {
    let h = spawn_controller();
    show_measured(&h).await;

    assert!(h.handle.touch(touch(TouchPhase::Down, 100, 300)).await);
    assert!(h.handle.touch(touch(TouchPhase::Move, 150, 300)).await);
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.window.map(|w| w.pos), Some(Pos::new(100, 200)));
    assert!(h.handle.touch(touch(TouchPhase::Up, 150, 300)).await);

    // Settle delay plus the 300ms animation.
    assert!(
        wait_status_until(&h.handle, 2000, |s| {
            s.window
                .is_some_and(|w| w.visual == VisualState::Minimized && w.pos.x == -270)
        })
        .await,
        "window never docked left"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn tap_on_docked_window_expands_it() {
    let h = spawn_controller();
    show_measured(&h).await;
    h.handle.touch(touch(TouchPhase::Down, 100, 300)).await;
    h.handle.touch(touch(TouchPhase::Move, 150, 300)).await;
    h.handle.touch(touch(TouchPhase::Up, 150, 300)).await;
    assert!(
        wait_status_until(&h.handle, 2000, |s| {
            s.window.is_some_and(|w| w.visual == VisualState::Minimized)
        })
        .await
    );

    // Any touch on the docked strip expands, fully handled.
    assert!(h.handle.touch(touch(TouchPhase::Down, 10, 300)).await);
    assert!(
        wait_status_until(&h.handle, 2000, |s| {
            s.window
                .is_some_and(|w| w.visual == VisualState::Expanded && w.pos.x == 20)
        })
        .await,
        "window never expanded"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn protected_regions_pass_touches_through() {
    let config = OverlayConfig {
        protected: vec![Rect::new(10, 10, 100, 40)],
        ..OverlayConfig::default()
    };
    let h = spawn_with(config, Arc::new(Granted));
    show_measured(&h).await;
    // Window at (50, 200): the button covers (60, 210)..(160, 250).
    assert!(!h.handle.touch(touch(TouchPhase::Down, 100, 230)).await);
    // Outside the button the controller takes the sequence.
    assert!(h.handle.touch(touch(TouchPhase::Down, 100, 400)).await);
}

#[tokio::test(flavor = "multi_thread")]
async fn short_tap_on_expanded_window_is_not_consumed() {
    let h = spawn_controller();
    show_measured(&h).await;
    assert!(h.handle.touch(touch(TouchPhase::Down, 100, 300)).await);
    // Down-only release on an expanded window stays clickable for the host.
    assert!(!h.handle.touch(touch(TouchPhase::Up, 102, 300)).await);
}

#[tokio::test(flavor = "multi_thread")]
async fn snap_waits_for_measurement_then_docks() {
    let h = spawn_controller();
    h.handle.show().await.expect("show");

    // Drag and release before any layout report arrives.
    h.handle.touch(touch(TouchPhase::Down, 100, 300)).await;
    h.handle.touch(touch(TouchPhase::Move, 150, 300)).await;
    h.handle.touch(touch(TouchPhase::Up, 150, 300)).await;

    // With width unknown there is no dock target; the snap keeps waiting.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let status = h.handle.status().await.expect("status");
    let window = status.window.expect("window");
    assert_eq!(window.visual, VisualState::Expanded);
    assert_eq!(window.pos, Pos::new(100, 200));

    // A late layout report unblocks the retry loop and the dock completes.
    h.handle.report_layout(Size::new(300, 400));
    assert!(
        wait_status_until(&h.handle, 2000, |s| {
            s.window
                .is_some_and(|w| w.visual == VisualState::Minimized && w.pos.x == -270)
        })
        .await,
        "window never docked after measurement"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn hide_during_settle_cancels_the_snap() {
    let h = spawn_controller();
    show_measured(&h).await;
    h.handle.touch(touch(TouchPhase::Down, 100, 300)).await;
    h.handle.touch(touch(TouchPhase::Move, 200, 300)).await;
    h.handle.touch(touch(TouchPhase::Up, 200, 300)).await;
    // Hide before the settle delay elapses; the stale settle message is dropped.
    h.handle.hide().await.expect("hide");
    let layouts_after_hide = h.comp.layout_count();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(h.comp.layout_count(), layouts_after_hide);
    assert_eq!(h.comp.attached_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn hide_mid_animation_stops_layout_updates() {
    let h = spawn_controller();
    show_measured(&h).await;
    h.handle.touch(touch(TouchPhase::Down, 100, 300)).await;
    h.handle.touch(touch(TouchPhase::Move, 200, 300)).await;
    h.handle.touch(touch(TouchPhase::Up, 200, 300)).await;
    let layouts_at_release = h.comp.layout_count();

    // Let the settle delay elapse and a few animation frames land.
    tokio::time::sleep(Duration::from_millis(180)).await;
    assert!(
        h.comp.layout_count() > layouts_at_release,
        "animation frames never applied"
    );

    // Hide while the snap is still animating; no further layout may land.
    h.handle.hide().await.expect("hide");
    let layouts_after_hide = h.comp.layout_count();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.comp.layout_count(), layouts_after_hide);
    assert_eq!(h.comp.attached_count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn session_lifecycle_emits_one_record() {
    let mut h = spawn_controller();
    show_measured(&h).await;
    drain(&mut h.rx);

    h.handle.start_session("Uber Eats").await.expect("start");
    assert!(
        recv_until(&mut h.rx, 1000, |m| {
            matches!(m, MsgToHost::Elapsed { display } if display == "00:00")
        })
        .await
    );
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.session, SessionStatus::InProgress);

    h.clock.advance(90_000);
    h.handle
        .finish_session("500", "", "2.4")
        .await
        .expect("finish");

    let mut record = None;
    assert!(
        recv_until(&mut h.rx, 1000, |m| {
            if let MsgToHost::SessionCompleted(r) = m {
                record = Some(r.clone());
                true
            } else {
                false
            }
        })
        .await
    );
    let record = record.expect("record");
    assert_eq!(record.delivery_service, "Uber Eats");
    assert_eq!(record.reward, "500");
    assert_eq!(record.start_time, "1000");
    assert_eq!(record.finish_time, "91000");
    assert_eq!(record.duration_minutes, "1");
    assert_eq!(record.estimated_time, "0");
    assert_eq!(record.distance, "2.4");

    // Final elapsed then the 00:00 reset follow the record.
    assert!(
        recv_until(&mut h.rx, 1000, |m| {
            matches!(m, MsgToHost::Elapsed { display } if display == "01:30")
        })
        .await
    );
    assert!(
        recv_until(&mut h.rx, 1000, |m| {
            matches!(m, MsgToHost::Elapsed { display } if display == "00:00")
        })
        .await
    );
    assert_eq!(h.cues.count(), 1);
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.session, SessionStatus::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_reward_rejects_finish_and_keeps_the_session() {
    let mut h = spawn_controller();
    show_measured(&h).await;
    h.handle.start_session("Wolt").await.expect("start");
    drain(&mut h.rx);

    assert!(matches!(
        h.handle.finish_session("", "30", "1.2").await,
        Err(Error::ValidationFailed { field: "reward" })
    ));
    // No record was emitted and the session is still live.
    assert!(
        !recv_until(&mut h.rx, 200, |m| {
            matches!(m, MsgToHost::SessionCompleted(_))
        })
        .await
    );
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.session, SessionStatus::InProgress);
    assert_eq!(h.cues.count(), 0);

    // Supplying the reward completes the same session.
    h.handle
        .finish_session("700", "30", "1.2")
        .await
        .expect("finish retry");
    let status = h.handle.status().await.expect("status");
    assert_eq!(status.session, SessionStatus::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn session_ticks_publish_elapsed_updates() {
    let mut h = spawn_controller();
    show_measured(&h).await;
    h.handle.start_session("Uber Eats").await.expect("start");
    drain(&mut h.rx);

    h.clock.advance(61_000);
    assert!(
        recv_until(&mut h.rx, 3000, |m| {
            matches!(m, MsgToHost::Elapsed { display } if display == "01:01")
        })
        .await,
        "no elapsed tick observed"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn session_preconditions_are_enforced() {
    let h = spawn_controller();
    assert!(matches!(
        h.handle.start_session("Wolt").await,
        Err(Error::SessionNotRunning)
    ));
    show_measured(&h).await;
    assert!(matches!(
        h.handle.finish_session("500", "", "").await,
        Err(Error::SessionNotRunning)
    ));
    h.handle.start_session("Wolt").await.expect("start");
    assert!(matches!(
        h.handle.start_session("Wolt").await,
        Err(Error::SessionAlreadyRunning)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn service_selection_is_read_at_finish() {
    let mut h = spawn_controller();
    show_measured(&h).await;
    h.handle.start_session("Uber Eats").await.expect("start");
    h.handle.select_service("DoorDash").await.expect("select");
    drain(&mut h.rx);

    h.handle.finish_session("900", "", "").await.expect("finish");
    assert!(
        recv_until(&mut h.rx, 1000, |m| {
            matches!(m, MsgToHost::SessionCompleted(r) if r.delivery_service == "DoorDash")
        })
        .await
    );
}
