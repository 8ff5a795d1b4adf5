use thiserror::Error;

use crate::ops::WindowId;

/// Errors surfaced by a host compositor implementation.
#[derive(Error, Debug)]
pub enum Error {
    /// The compositor refused to attach the window (host-side resource or
    /// policy failure).
    #[error("compositor rejected attach: {0}")]
    AttachRejected(String),

    /// A window was attached twice without an intervening detach.
    #[error("window {0} already attached")]
    AlreadyAttached(WindowId),

    /// The operation referenced a window the compositor is not tracking.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
}

/// Convenience alias for compositor results.
pub type Result<T> = std::result::Result<T, Error>;
