//! Delivery session state machine.
//!
//! Tracks one timed work unit from `start` to a validated `finish`, producing
//! the [`SessionRecord`] the host persists. All timestamps are epoch
//! milliseconds supplied by the caller's clock.

use overdash_protocol::SessionRecord;
use tracing::debug;

use crate::error::{Error, Result};

/// Session timer interval.
pub const SESSION_TICK_MS: u64 = 1000;

/// Session progress state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No session; all fields cleared.
    #[default]
    Idle,
    /// Started, not yet finished.
    InProgress,
    /// Finished and validated. Transient: the session resets to idle as soon
    /// as its record has been built.
    Completed,
}

/// One delivery work session.
#[derive(Clone, Debug, Default)]
pub struct DeliverySession {
    service_name: String,
    reward: String,
    estimated_minutes: String,
    distance: String,
    start_time: u64,
    finish_time: u64,
    status: SessionStatus,
}

impl DeliverySession {
    /// Current progress state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Start timestamp, epoch ms; 0 when idle.
    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Service the session is being worked for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Begin a session for `service` at `now_ms`.
    pub fn start(&mut self, service: &str, now_ms: u64) -> Result<()> {
        if self.status == SessionStatus::InProgress {
            return Err(Error::SessionAlreadyRunning);
        }
        self.service_name = service.to_string();
        self.start_time = now_ms;
        self.finish_time = 0;
        self.status = SessionStatus::InProgress;
        debug!(service, start_ms = now_ms, "session_started");
        Ok(())
    }

    /// Update the service of an in-progress session. The selector stays live
    /// during a session and is read at finish; no-op while idle.
    pub fn select_service(&mut self, service: &str) {
        if self.status == SessionStatus::InProgress {
            self.service_name = service.to_string();
        }
    }

    /// Finish the session at `now_ms`, producing its record.
    ///
    /// An empty `reward` is rejected and the session keeps running. Empty
    /// `estimated_minutes`/`distance` default to `"0"` (only the reward is
    /// required). On success all fields reset to idle defaults.
    pub fn finish(
        &mut self,
        reward: &str,
        estimated_minutes: &str,
        distance: &str,
        now_ms: u64,
    ) -> Result<SessionRecord> {
        if self.status != SessionStatus::InProgress {
            return Err(Error::SessionNotRunning);
        }
        if reward.is_empty() {
            return Err(Error::ValidationFailed { field: "reward" });
        }
        self.finish_time = now_ms;
        self.status = SessionStatus::Completed;

        let duration_minutes = (self.finish_time - self.start_time) / 60_000;
        let record = SessionRecord {
            delivery_service: self.service_name.clone(),
            estimated_time: or_zero(estimated_minutes),
            reward: reward.to_string(),
            start_time: self.start_time.to_string(),
            finish_time: self.finish_time.to_string(),
            memo: String::new(),
            distance: or_zero(distance),
            duration_minutes: duration_minutes.to_string(),
        };
        debug!(
            service = %record.delivery_service,
            duration_minutes,
            "session_completed"
        );
        *self = Self::default();
        Ok(record)
    }

    /// Elapsed display for the in-progress session; `00:00` while idle.
    pub fn elapsed_display(&self, now_ms: u64) -> String {
        if self.status != SessionStatus::InProgress {
            return format_elapsed(0);
        }
        format_elapsed(now_ms.saturating_sub(self.start_time))
    }
}

fn or_zero(s: &str) -> String {
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Format elapsed milliseconds as `mm:ss`, truncating partial seconds.
pub fn format_elapsed(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
