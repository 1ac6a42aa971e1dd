//! Header byte encoding and message sizing for the EV3 UART protocol.
//!
//! Every message on the wire starts with a single header byte laid out
//! as `TT SSS CCC` (MSB first):
//!
//! - `TT` — message class: `00` SYS, `01` CMD, `10` INFO, `11` DATA
//! - `SSS` — payload-size exponent; the payload is `2^SSS` bytes long
//! - `CCC` — command code (CMD), or the mode index the message refers
//!   to (INFO and DATA)
//!
//! SYS messages are bare single bytes with no payload or checksum. CMD
//! and DATA messages append their payload and a trailing checksum to
//! the header. INFO messages additionally carry a sub-command byte
//! between header and payload, which is not counted in the declared
//! payload length.
//!
//! ## Functions
//!
//! - [`msg_size`]: total on-wire size of a message, from its header
//! - [`encode_header`]: pack class, payload length, and command code
//! - [`decode_header`]: recover `(class, payload length, command)`
//!
//! The encode/decode pair round-trips for every payload length that is
//! a power of two up to 32 and every 3-bit command code.

/// Mask of the message-class bits in a header byte.
pub const MSG_CLASS_MASK: u8 = 0xC0;

/// Mask of the payload-size exponent bits in a header byte.
pub const MSG_SIZE_MASK: u8 = 0x38;

/// Mask of the command / mode-index bits in a header byte.
pub const MSG_CMD_MASK: u8 = 0x07;

/// SYS synchronization byte, sent by sensors between handshake retries.
pub const SYS_SYNC: u8 = 0x00;

/// SYS negative-acknowledge byte; doubles as the host's keep-alive
/// probe while the link is streaming data.
pub const SYS_NACK: u8 = 0x02;

/// SYS acknowledge byte, closing the handshake in both directions.
pub const SYS_ACK: u8 = 0x04;

/// SYS escape byte. Reserved by the protocol; ignored on receipt.
pub const SYS_ESC: u8 = 0x06;

/// CMD code: sensor type announcement.
pub const CMD_TYPE: u8 = 0x00;

/// CMD code: mode and view-mode counts.
pub const CMD_MODES: u8 = 0x01;

/// CMD code: requested line speed for the data phase.
pub const CMD_SPEED: u8 = 0x02;

/// CMD code: host-to-sensor mode selection.
pub const CMD_SELECT: u8 = 0x03;

/// CMD code: host-to-sensor raw command payload.
pub const CMD_WRITE: u8 = 0x04;

/// INFO sub-command: mode name.
pub const INFO_NAME: u8 = 0x00;

/// INFO sub-command: raw value range.
pub const INFO_RAW: u8 = 0x01;

/// INFO sub-command: percentage value range.
pub const INFO_PCT: u8 = 0x02;

/// INFO sub-command: SI value range.
pub const INFO_SI: u8 = 0x03;

/// INFO sub-command: unit of measure.
pub const INFO_UNITS: u8 = 0x04;

/// INFO sub-command: sample layout (data sets, format, display hints).
pub const INFO_FORMAT: u8 = 0x80;

/// The four message classes carried by the top two header bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    /// Single-byte system messages: SYNC, NACK, ACK, ESC.
    Sys,
    /// Command messages exchanged during the handshake and for
    /// host-to-sensor control.
    Cmd,
    /// Mode metadata records sent during the handshake.
    Info,
    /// Measurement frames sent while the link is streaming.
    Data,
}

impl MessageClass {
    /// Extracts the message class from a header byte.
    pub fn of(header: u8) -> Self {
        match header & MSG_CLASS_MASK {
            0x00 => MessageClass::Sys,
            0x40 => MessageClass::Cmd,
            0x80 => MessageClass::Info,
            _ => MessageClass::Data,
        }
    }

    /// The class bits as they appear in a header byte.
    pub const fn bits(self) -> u8 {
        match self {
            MessageClass::Sys => 0x00,
            MessageClass::Cmd => 0x40,
            MessageClass::Info => 0x80,
            MessageClass::Data => 0xC0,
        }
    }
}

/// Declared payload length of a message, in bytes.
///
/// This is `2^SSS` and applies to CMD, INFO, and DATA classes; SYS
/// messages carry no payload.
pub fn payload_size(header: u8) -> usize {
    1 << ((header & MSG_SIZE_MASK) >> 3)
}

/// Total on-wire size of the message beginning with `header`.
///
/// SYS messages are exactly one byte. CMD and DATA messages span the
/// header, the declared payload, and one checksum byte. INFO messages
/// carry one additional sub-command byte.
pub fn msg_size(header: u8) -> usize {
    match MessageClass::of(header) {
        MessageClass::Sys => 1,
        MessageClass::Cmd | MessageClass::Data => 1 + payload_size(header) + 1,
        MessageClass::Info => 1 + 1 + payload_size(header) + 1,
    }
}

/// Packs a header byte from class, payload length, and command code.
///
/// `payload_len` must be a power of two in `[1, 32]`; its base-2
/// logarithm becomes the size exponent. `cmd` occupies the low three
/// bits (a command code for CMD, a mode index for INFO and DATA).
pub fn encode_header(class: MessageClass, payload_len: usize, cmd: u8) -> u8 {
    let exp = payload_len.trailing_zeros() as u8;
    class.bits() | (exp << 3) & MSG_SIZE_MASK | cmd & MSG_CMD_MASK
}

/// Recovers `(class, payload length, command code)` from a header byte.
pub fn decode_header(header: u8) -> (MessageClass, usize, u8) {
    (
        MessageClass::of(header),
        payload_size(header),
        header & MSG_CMD_MASK,
    )
}
