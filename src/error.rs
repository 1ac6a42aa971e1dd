//! Errors reported to callers of the session's command and read surface.
//!
//! Protocol failures on the wire never show up here: those drive the
//! resynchronization path and are visible only through the session's
//! phase and its diagnostic string. This enum covers the caller's own
//! mistakes and failures of the underlying serial transport.

use core::fmt::Debug;
use thiserror::Error;

/// A rejected session command or read, generic over the transport's
/// error type.
#[derive(Debug, Error)]
pub enum Error<E: Debug> {
    /// The link has no sensor in the streaming phase.
    #[error("no sensor is connected and streaming")]
    NotConnected,
    /// A mode index at or beyond the sensor's mode count.
    #[error("mode {0} is out of range for this sensor")]
    InvalidMode(u8),
    /// A value index at or beyond the active mode's data sets.
    #[error("value index {0} is out of range for the active mode")]
    InvalidValueIndex(u8),
    /// A byte range that does not fit the active mode's sample storage.
    #[error("requested byte range is out of bounds")]
    InvalidRange,
    /// A command payload that is empty or longer than 32 bytes.
    #[error("unsupported command payload size {0}")]
    PayloadSize(usize),
    /// The serial transport rejected a write.
    #[error("transport error: {0:?}")]
    Transport(E),
}
