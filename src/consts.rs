//! Constants shared across the EV3 UART protocol implementation.
//!
//! This module defines protocol-wide constants for buffer sizing, mode
//! table limits, reserved type identifiers, line-speed bounds, and the
//! timing of the post-handshake delayed actions and the keep-alive
//! watchdog.
//!
//! These values follow the framing conventions of the EV3 UART sensor
//! protocol, in which every sensor announces itself at 2400 baud,
//! describes up to eight measurement modes, and then streams data at a
//! negotiated rate while the host probes the link every 100 ms.
//!
//! ## Key Concepts
//!
//! - **Type identifiers**: an 8-bit namespace declared by the sensor at
//!   handshake start; `TYPE_UNKNOWN` is reserved for a link that has not
//!   completed synchronization.
//! - **Mode table**: fixed 8-slot table; each slot carries a short name,
//!   scaling limits, a unit string, and the latest sample bytes.
//! - **Timing**: the acknowledge reply and the baud-rate change are both
//!   issued after a short settle delay; the keep-alive probe runs on a
//!   fixed period with a half-period initial offset.

use core::time::Duration;

/// Size of the receive window in bytes.
///
/// Incoming bytes accumulate here until a complete frame can be lifted
/// out. A full window with no extractable frame means the stream has
/// lost framing and forces a resynchronization.
pub const RX_BUFFER_SIZE: usize = 256;

/// Largest complete frame the protocol can produce.
///
/// An INFO frame with the maximum 32-byte payload: header, sub-command,
/// payload, and trailing checksum.
pub const MAX_FRAME_SIZE: usize = 35;

/// Maximum payload carried by a single CMD, INFO, or DATA frame.
pub const MAX_PAYLOAD_SIZE: usize = 32;

/// Number of mode slots in the per-sensor mode table.
pub const MAX_MODES: usize = 8;

/// Maximum length of a mode name, in bytes.
pub const MODE_NAME_SIZE: usize = 11;

/// Maximum length of a unit-of-measure string, in bytes.
pub const UNITS_SIZE: usize = 4;

/// Size of a mode's sample storage, in bytes.
///
/// Every DATA payload fits here; scalar values are read back from this
/// storage at `index * sizeof(format)`.
pub const RAW_DATA_SIZE: usize = 32;

/// Highest valid sensor type identifier a sensor may declare.
pub const TYPE_MAX: u8 = 101;

/// Reserved type identifier for a link with no synchronized sensor.
pub const TYPE_UNKNOWN: u8 = 125;

/// Type identifier of the EV3 color sensor.
///
/// Subject of the checksum exception for DATA frames whose first
/// payload byte is `0xDC`; see the session documentation.
pub const TYPE_EV3_COLOR: u8 = 29;

/// Type identifier of the EV3 infrared sensor.
///
/// Source of the split SYNC quirk handled at the frame boundary: its
/// SYNC byte and the complementary `0xFF` that follows may straddle two
/// deliveries.
pub const TYPE_EV3_IR: u8 = 33;

/// Line speed every sensor handshakes at, and the floor of the
/// negotiable range.
pub const MIN_BAUD_RATE: u32 = 2400;

/// Ceiling of the negotiable line-speed range.
pub const MAX_BAUD_RATE: u32 = 460_800;

/// Settle delay between receiving the sensor's handshake-complete ACK
/// and transmitting the host's ACK reply.
pub const ACK_DELAY: Duration = Duration::from_millis(10);

/// Settle delay between the host's ACK reply and the line-speed change,
/// and between a resynchronization and the restore to 2400 baud.
pub const BAUD_DELAY: Duration = Duration::from_millis(10);

/// Period of the keep-alive watchdog while the link is streaming data.
///
/// Each tick transmits a NACK probe; a period with no valid DATA frame
/// counts against [`MAX_DATA_ERRORS`]. The first tick after the baud
/// change fires after half a period.
pub const KEEPALIVE_PERIOD: Duration = Duration::from_millis(100);

/// Number of accumulated data errors that trips a resynchronization.
///
/// Bad DATA checksums and missed keep-alive windows increment the
/// count; every valid DATA frame decays it toward zero.
pub const MAX_DATA_ERRORS: u8 = 6;
