//! The serial-line seam between the engine and the host's UART driver.

use embedded_io::Write;

/// Byte transport for one sensor link.
///
/// The engine writes frames through the [`embedded_io::Write`]
/// supertrait and controls the line through the two methods here.
/// Receive is push-model and does not appear in this trait: the host
/// feeds incoming bytes to `Session::receive` from its own read path.
///
/// Contract notes:
///
/// - [`set_baud_rate`](Transport::set_baud_rate) must let any pending
///   transmit bytes drain before reconfiguring the line, so the ACK
///   reply always leaves at the speed it was written at.
/// - Writes may block briefly on the line driver; the engine only
///   writes outside its framing fast path.
pub trait Transport: Write {
    /// Drains the transmit path, then reconfigures the line speed.
    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error>;

    /// Discards any bytes buffered on the receive side of the line.
    fn discard_input(&mut self) -> Result<(), Self::Error>;
}
