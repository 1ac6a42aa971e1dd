//! Upstream notification seam.
//!
//! A session announces link events through this trait: the host's
//! registry (a sysfs-style attribute surface, a message bus, or a test
//! recorder) reacts by publishing or revoking the sensor it wraps.
//! Queries flow the other way — callers read identity, mode metadata,
//! and samples directly from the session.
//!
//! All methods default to no-ops so polling hosts can pass `()`.

use crate::modes::ModeInfo;

/// Receiver for sensor lifecycle and data notifications.
pub trait Publisher {
    /// A sensor finished its handshake and is ready for use.
    ///
    /// `modes` holds the discovered mode table, lowest mode first.
    /// Fired once per session, and again only if a resynchronized link
    /// completes a handshake as a different sensor type.
    fn sensor_attached(&mut self, type_id: u8, modes: &[ModeInfo]) {
        let _ = (type_id, modes);
    }

    /// The published sensor handle is being revoked.
    fn sensor_detached(&mut self) {}

    /// The sensor confirmed a different active mode.
    fn mode_changed(&mut self, mode: u8) {
        let _ = mode;
    }

    /// A fresh sample arrived for `mode`.
    fn sample_ready(&mut self, mode: u8, raw: &[u8]) {
        let _ = (mode, raw);
    }
}

/// No-op publisher for hosts that poll the session instead.
impl Publisher for () {}
