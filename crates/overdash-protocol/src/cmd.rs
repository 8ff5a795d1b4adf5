//! Typed command definitions for the Overdash host surface.
//!
//! This module defines the command names and shapes a host bridge uses to
//! drive the overlay controller. Each command is fire-and-forget from the
//! host's point of view; acknowledgment and errors travel back on the
//! caller's result channel.

use serde::{Deserialize, Serialize};

/// Commands accepted from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "cmd")]
pub enum HostCommand {
    /// Show the overlay, constructing a fresh instance if none is running.
    Show,
    /// Hide the overlay and tear the running instance down.
    Hide,
    /// Like hide, but also suppresses any host-side auto-restart.
    Stop,
    /// Move the overlay window to an absolute screen position.
    Move {
        /// Target x, screen pixels.
        x: i32,
        /// Target y, screen pixels.
        y: i32,
    },
}

impl HostCommand {
    /// Stable string name for the command when talking to a host bridge.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostCommand::Show => "show",
            HostCommand::Hide => "hide",
            HostCommand::Stop => "stop",
            HostCommand::Move { .. } => "move",
        }
    }
}
