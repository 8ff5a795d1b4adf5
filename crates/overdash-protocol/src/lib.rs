use serde::{Deserialize, Serialize};

/// Host command definitions with stable wire names.
pub mod cmd;

pub use cmd::HostCommand;

/// Completed delivery-session record emitted toward the host.
///
/// Every field is string-encoded: the host bridge forwards the record verbatim
/// into an event payload whose consumers expect strings, including the epoch
/// timestamps. Wire keys are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Delivery service the session was worked for.
    pub delivery_service: String,
    /// Estimated time in minutes; `"0"` when the user left it blank.
    pub estimated_time: String,
    /// Reward amount; always non-empty (validated before emission).
    pub reward: String,
    /// Session start, milliseconds since the Unix epoch.
    pub start_time: String,
    /// Session finish, milliseconds since the Unix epoch.
    pub finish_time: String,
    /// Free-form note slot; currently always empty.
    pub memo: String,
    /// Distance travelled; `"0"` when the user left it blank.
    pub distance: String,
    /// Whole minutes between start and finish, truncated.
    pub duration_minutes: String,
}

/// Messages sent from the controller to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MsgToHost {
    /// A delivery session finished and validated; carries the full record.
    SessionCompleted(SessionRecord),

    /// Elapsed-time display update for the in-progress session (`mm:ss`).
    Elapsed {
        /// Formatted `mm:ss` value, zero-padded, truncated.
        display: String,
    },

    /// Notification request for the host UI.
    Notify {
        /// Severity of the notification.
        kind: NotifyKind,
        /// Short headline.
        title: String,
        /// Body text.
        text: String,
    },
}

/// Severity of a host notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotifyKind {
    /// Informational breadcrumb.
    Info,
    /// Something degraded but the controller carries on.
    Warn,
    /// An operation failed and the user should know.
    Error,
    /// An operation completed that deserves positive feedback.
    Success,
}

/// IPC-related helpers: channel aliases for the host boundary.
pub mod ipc {
    use super::MsgToHost;

    /// Tokio unbounded sender for host messages.
    pub type HostTx = tokio::sync::mpsc::UnboundedSender<MsgToHost>;
    /// Tokio unbounded receiver for host messages.
    pub type HostRx = tokio::sync::mpsc::UnboundedReceiver<MsgToHost>;

    /// Create a standard unbounded host channel (sender, receiver).
    pub fn host_channel() -> (HostTx, HostRx) {
        tokio::sync::mpsc::unbounded_channel::<MsgToHost>()
    }
}
