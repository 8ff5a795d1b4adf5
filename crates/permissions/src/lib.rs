//! Overlay permission checks for Overdash.
//!
//! This crate exposes a minimal, stable API to query whether the host may
//! draw over other applications. The actual check lives with the host
//! platform, so it is modeled as a trait the host implements; the controller
//! only ever asks for a boolean. There is no prompting logic here: the host
//! is responsible for guiding the user through its settings flow when the
//! permission is missing.
//!
//! All calls are fast and side-effect free.

use serde::{Deserialize, Serialize};

/// Host-implemented oracle answering "may we draw over other apps?".
pub trait PermissionOracle: Send + Sync {
    /// `true` when the overlay permission is currently granted.
    fn overlay_ok(&self) -> bool;
}

/// Oracle that always reports the permission as granted.
///
/// Useful for tests and for hosts whose platform needs no grant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Granted;

impl PermissionOracle for Granted {
    fn overlay_ok(&self) -> bool {
        true
    }
}

/// Oracle that always reports the permission as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Denied;

impl PermissionOracle for Denied {
    fn overlay_ok(&self) -> bool {
        false
    }
}

/// Current permission status for the process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PermissionsStatus {
    /// Draw-over-other-apps permission; `true` if granted.
    pub overlay_ok: bool,
}

/// Query the overlay permission as a status struct.
///
/// This is a convenience wrapper over [`PermissionOracle::overlay_ok`]. The
/// function performs no prompting and has no side effects.
pub fn check_permissions(oracle: &dyn PermissionOracle) -> PermissionsStatus {
    PermissionsStatus {
        overlay_ok: oracle.overlay_ok(),
    }
}
