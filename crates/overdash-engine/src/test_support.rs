//! Test support utilities for overdash-engine integration tests.
//! These helpers are public to avoid dead_code warnings and are lightweight.
//! They are intended for use by the test suite only.

use std::time::Duration;

use overdash_protocol::{MsgToHost, ipc::HostRx};
use tokio::time::{Instant, sleep};

use crate::{ControllerStatus, OverlayHandle};

/// Receive host messages until `pred` matches or `timeout_ms` elapses.
pub async fn recv_until<F>(rx: &mut HostRx, timeout_ms: u64, mut pred: F) -> bool
where
    F: FnMut(&MsgToHost) -> bool,
{
    tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        while let Some(msg) = rx.recv().await {
            if pred(&msg) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false)
}

/// Poll the controller status until `pred` holds, up to `timeout_ms`.
pub async fn wait_status_until<F>(handle: &OverlayHandle, timeout_ms: u64, mut pred: F) -> bool
where
    F: FnMut(&ControllerStatus) -> bool,
{
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if let Ok(status) = handle.status().await
            && pred(&status)
        {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(2)).await;
    }
}

/// Drain any messages already queued on the host channel.
pub fn drain(rx: &mut HostRx) {
    while rx.try_recv().is_ok() {}
}
