use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the Overdash engine.
#[derive(Debug, Error)]
pub enum Error {
    /// `show` was requested without the draw-over-apps permission.
    #[error("overlay permission not granted")]
    PermissionDenied,

    /// The compositor rejected the overlay window.
    #[error("window attach failed: {0}")]
    AttachFailed(#[from] overdash_surface::Error),

    /// A required session field was missing at finish time.
    #[error("missing required field: {field}")]
    ValidationFailed {
        /// Name of the field the user must supply.
        field: &'static str,
    },

    /// `start` was requested while a session is already in progress.
    #[error("a delivery session is already in progress")]
    SessionAlreadyRunning,

    /// A session operation arrived with no session (or no overlay) running.
    #[error("no delivery session in progress")]
    SessionNotRunning,

    /// The host event channel has been closed by the receiver.
    #[error("host channel closed")]
    ChannelClosed,
}
