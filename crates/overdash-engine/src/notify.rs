use overdash_protocol::{MsgToHost, NotifyKind, SessionRecord, ipc::HostTx};
use tracing::info;

use crate::error::{Error, Result};

/// Sends session records, elapsed-time updates, and notifications to the host.
#[derive(Clone)]
pub struct HostNotifier {
    tx: HostTx,
}

impl HostNotifier {
    /// Create a notifier from the host message channel.
    pub fn new(tx: HostTx) -> Self {
        Self { tx }
    }

    /// Emit a completed-session record.
    pub fn send_session_completed(&self, record: SessionRecord) -> Result<()> {
        info!(
            service = %record.delivery_service,
            reward = %record.reward,
            duration_minutes = %record.duration_minutes,
            "session_record_emitted"
        );
        self.tx
            .send(MsgToHost::SessionCompleted(record))
            .map_err(|_| Error::ChannelClosed)
    }

    /// Publish an `mm:ss` elapsed display value.
    pub fn send_elapsed(&self, display: String) -> Result<()> {
        self.tx
            .send(MsgToHost::Elapsed { display })
            .map_err(|_| Error::ChannelClosed)
    }

    /// Send a user-visible notification.
    pub fn send_notification(&self, kind: NotifyKind, title: &str, text: String) -> Result<()> {
        // Always log notification displays at info level for traceability.
        info!(kind = ?kind, title = %title, text = %text, "notification_display");
        self.tx
            .send(MsgToHost::Notify {
                kind,
                title: title.to_string(),
                text,
            })
            .map_err(|_| Error::ChannelClosed)
    }
}
