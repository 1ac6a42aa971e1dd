//! The per-link protocol state machine.
//!
//! A [`Session`] owns one sensor link from attach to detach. It starts
//! out scanning the raw byte stream for a freshly powered sensor's type
//! announcement, collects the self-describing mode catalog, answers the
//! handshake with a delayed ACK, moves the line to the sensor's
//! requested speed, and then consumes measurement frames while probing
//! the link with periodic keep-alive traffic. Any framing, protocol, or
//! persistent checksum failure drops the session back to the scanning
//! state at 2400 baud, where the sensor's own handshake restart can be
//! observed afresh.
//!
//! ## Driving a session
//!
//! The engine is passive: the host pushes received bytes into
//! [`receive`](Session::receive) and calls [`poll`](Session::poll)
//! often enough for the 10 ms handshake delays and the 100 ms
//! keep-alive period to be honored. Both entry points take `&mut self`,
//! which serializes the byte-receive, delayed-work, and watchdog
//! contexts by ownership; hosts delivering bytes from interrupt context
//! wrap the session in whatever mutual exclusion they already use for
//! the line.
//!
//! ## Reading and commanding
//!
//! Identity and catalog queries are always available; sample reads and
//! the [`set_mode`](Session::set_mode) / [`write`](Session::write)
//! commands require the streaming phase. Mode selection is optimistic:
//! the sensor confirms by tagging its next DATA frame, at which point
//! [`mode`](Session::mode) follows and the publisher hears about it.

use crate::checksum::frame_checksum;
use crate::codec::{
    CMD_MODES, CMD_SELECT, CMD_SPEED, CMD_WRITE, INFO_FORMAT, INFO_NAME, INFO_PCT, INFO_RAW,
    INFO_SI, INFO_UNITS, MSG_CMD_MASK, MessageClass, SYS_ACK, SYS_NACK, encode_header,
};
use crate::consts::{
    ACK_DELAY, BAUD_DELAY, KEEPALIVE_PERIOD, MAX_BAUD_RATE, MAX_DATA_ERRORS, MAX_MODES,
    MAX_PAYLOAD_SIZE, MIN_BAUD_RATE, RAW_DATA_SIZE, TYPE_EV3_COLOR, TYPE_UNKNOWN,
};
use crate::error::Error;
use crate::framer::Framer;
use crate::modes::{DataFormat, ModeInfo};
use crate::publish::Publisher;
use crate::timer::{Clock, OneShot, Watchdog};
use crate::transport::Transport;
use bitflags::bitflags;
use heapless::String;
use log::{debug, info, trace, warn};

bitflags! {
    /// Receipt tracking for the handshake records of the mode under
    /// discovery. A NAME record restarts the per-mode subset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct InfoFlags: u16 {
        const CMD_TYPE = 1 << 0;
        const CMD_MODES = 1 << 1;
        const CMD_SPEED = 1 << 2;
        const INFO_NAME = 1 << 3;
        const INFO_RAW = 1 << 4;
        const INFO_PCT = 1 << 5;
        const INFO_SI = 1 << 6;
        const INFO_UNITS = 1 << 7;
        const INFO_FORMAT = 1 << 8;
        const REQUIRED = Self::CMD_TYPE.bits()
            | Self::CMD_MODES.bits()
            | Self::INFO_NAME.bits()
            | Self::INFO_FORMAT.bits();
        const MODE_RECORDS = Self::INFO_NAME.bits()
            | Self::INFO_RAW.bits()
            | Self::INFO_PCT.bits()
            | Self::INFO_SI.bits()
            | Self::INFO_UNITS.bits()
            | Self::INFO_FORMAT.bits();
    }
}

/// Lifecycle of a sensor link.
///
/// Transitions run strictly forward through the handshake and loop back
/// through `Failing` whenever the link has to be abandoned. `Failing`
/// is transient: a session entering it finishes its cleanup and rests
/// in [`Unsynced`](Phase::Unsynced) before control returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Scanning the raw byte stream for a sensor's type announcement.
    #[default]
    Unsynced,
    /// Collecting the sensor's mode catalog records.
    Collecting,
    /// Catalog complete; the ACK reply is scheduled.
    AckPending,
    /// ACK sent; the line-speed change is scheduled.
    BaudSwitching,
    /// Streaming measurement data at the negotiated speed.
    Running,
    /// Abandoning the link and resetting for a fresh handshake.
    Failing,
}

/// Protocol engine for one UART sensor link.
///
/// Generic over the serial [`Transport`], the upstream [`Publisher`],
/// and the [`Clock`] that timestamps [`poll`](Session::poll) calls.
#[derive(Debug)]
pub struct Session<T, P, C>
where
    T: Transport,
    P: Publisher,
    C: Clock,
{
    transport: T,
    publisher: P,
    clock: C,
    phase: Phase,
    sensor_type: u8,
    num_modes: u8,
    num_view_modes: u8,
    current_mode: u8,
    info_flags: InfoFlags,
    new_baud_rate: u32,
    framer: Framer,
    mode_info: [ModeInfo; MAX_MODES],
    data_error_count: u8,
    last_data_seen: bool,
    last_error: &'static str,
    registered: bool,
    registered_type: u8,
    ack_timer: OneShot,
    baud_timer: OneShot,
    watchdog: Watchdog,
}

impl<T, P, C> Session<T, P, C>
where
    T: Transport,
    P: Publisher,
    C: Clock,
{
    /// Opens a session on a link the host has already configured to
    /// 2400 baud.
    pub fn new(transport: T, publisher: P, clock: C) -> Self {
        Self {
            transport,
            publisher,
            clock,
            phase: Phase::Unsynced,
            sensor_type: TYPE_UNKNOWN,
            num_modes: 0,
            num_view_modes: 0,
            current_mode: 0,
            info_flags: InfoFlags::empty(),
            new_baud_rate: MIN_BAUD_RATE,
            framer: Framer::new(),
            mode_info: Default::default(),
            data_error_count: 0,
            last_data_seen: false,
            last_error: "",
            registered: false,
            registered_type: TYPE_UNKNOWN,
            ack_timer: OneShot::default(),
            baud_timer: OneShot::default(),
            watchdog: Watchdog::new(KEEPALIVE_PERIOD),
        }
    }

    /// Feeds bytes delivered by the serial line into the engine.
    ///
    /// Bytes are consumed and framed strictly in arrival order.
    /// Deliveries may split frames at any position, including inside
    /// the sync triplet. A receive window that fills without yielding a
    /// single complete frame has lost framing and forces a
    /// resynchronization.
    pub fn receive(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let copied = self.framer.fill(data);
            data = &data[copied..];
            self.pump();
            if copied == 0 && self.framer.is_full() {
                self.resync("Receive buffer overflow.");
            }
        }
    }

    /// Fires any timers that have come due.
    ///
    /// Call this from the host's event loop. The handshake's two
    /// delayed actions and the keep-alive watchdog all run here; a
    /// missed keep-alive deadline reschedules from the current call,
    /// not from the missed target.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        if self.ack_timer.fire(now) {
            self.finish_handshake();
        }
        if self.baud_timer.fire(now) {
            self.apply_baud_change();
        }
        if self.watchdog.fire(now) {
            if self.keepalive_tick() {
                self.watchdog.rearm(now);
            }
        }
    }

    /// Tears the session down before the host releases the link.
    ///
    /// Cancels all pending timers (synchronously; they are plain data),
    /// discards any partially buffered frame, and revokes the published
    /// sensor handle.
    pub fn detach(&mut self) {
        self.ack_timer.cancel();
        self.baud_timer.cancel();
        self.watchdog.stop();
        self.framer.clear();
        self.phase = Phase::Unsynced;
        self.sensor_type = TYPE_UNKNOWN;
        if self.registered {
            self.publisher.sensor_detached();
            self.registered = false;
        }
    }

    /// The sensor's declared type identifier, or the reserved unknown
    /// value while no sensor is synchronized.
    pub fn type_id(&self) -> u8 {
        self.sensor_type
    }

    /// The active mode index.
    ///
    /// During discovery this follows the mode whose records are being
    /// collected; afterwards it reflects the mode the sensor most
    /// recently confirmed by DATA.
    pub fn mode(&self) -> u8 {
        self.current_mode
    }

    /// The discovered mode catalog, lowest mode first.
    ///
    /// Empty until the sensor's mode count is known.
    pub fn modes(&self) -> &[ModeInfo] {
        &self.mode_info[..usize::from(self.num_modes)]
    }

    /// The sensor's declared count of view modes.
    ///
    /// Stored as announced; the protocol attaches no further meaning to
    /// it here.
    pub fn view_modes(&self) -> u8 {
        self.num_view_modes
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The accumulated data error count.
    pub fn data_errors(&self) -> u8 {
        self.data_error_count
    }

    /// Diagnostic reason for the most recent resynchronization.
    ///
    /// Cleared once the link completes its next handshake.
    pub fn last_error(&self) -> &'static str {
        self.last_error
    }

    /// The line speed negotiated for the data phase.
    pub fn baud_rate(&self) -> u32 {
        self.new_baud_rate
    }

    /// Asks the sensor to switch to `mode`.
    ///
    /// Emits a SELECT command and returns without waiting for
    /// confirmation: the sensor acknowledges by tagging its next DATA
    /// frame, which is when [`mode`](Session::mode) changes and the
    /// publisher is notified.
    pub fn set_mode(&mut self, mode: u8) -> Result<(), Error<T::Error>> {
        if self.phase != Phase::Running {
            return Err(Error::NotConnected);
        }
        if mode >= self.num_modes {
            return Err(Error::InvalidMode(mode));
        }
        let mut cmd = [encode_header(MessageClass::Cmd, 1, CMD_SELECT), mode, 0];
        cmd[2] = frame_checksum(&cmd[..2]);
        self.transport.write_all(&cmd).map_err(Error::Transport)
    }

    /// Sends an arbitrary command payload to the sensor.
    ///
    /// The payload length is rounded up to the next power of two (at
    /// most 32), zero-padded, and wrapped in a WRITE header and
    /// trailing checksum.
    pub fn write(&mut self, payload: &[u8]) -> Result<(), Error<T::Error>> {
        if self.phase != Phase::Running {
            return Err(Error::NotConnected);
        }
        if payload.is_empty() || payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadSize(payload.len()));
        }
        let padded = payload.len().next_power_of_two();
        let mut cmd = [0; 2 + MAX_PAYLOAD_SIZE];
        cmd[0] = encode_header(MessageClass::Cmd, padded, CMD_WRITE);
        cmd[1..1 + payload.len()].copy_from_slice(payload);
        cmd[1 + padded] = frame_checksum(&cmd[..1 + padded]);
        self.transport
            .write_all(&cmd[..padded + 2])
            .map_err(Error::Transport)
    }

    /// Reads one scalar from the active mode's latest sample.
    ///
    /// Returns [`nb::Error::WouldBlock`] while no sensor is streaming,
    /// and an index error when `index` is at or beyond the active
    /// mode's data sets.
    pub fn value(&self, index: u8) -> nb::Result<i32, Error<T::Error>> {
        if self.phase != Phase::Running {
            return Err(nb::Error::WouldBlock);
        }
        self.mode_info[usize::from(self.current_mode)]
            .value(usize::from(index))
            .ok_or(nb::Error::Other(Error::InvalidValueIndex(index)))
    }

    /// Borrows a byte range of the active mode's latest sample.
    pub fn raw_bytes(&self, offset: usize, len: usize) -> Result<&[u8], Error<T::Error>> {
        if self.phase != Phase::Running {
            return Err(Error::NotConnected);
        }
        let end = offset.checked_add(len).ok_or(Error::InvalidRange)?;
        if end > RAW_DATA_SIZE {
            return Err(Error::InvalidRange);
        }
        Ok(&self.mode_info[usize::from(self.current_mode)].raw_data()[offset..end])
    }

    fn pump(&mut self) {
        loop {
            if self.phase == Phase::Unsynced {
                match self.framer.scan_sync() {
                    Some(type_id) => self.on_sync(type_id),
                    None => return,
                }
                continue;
            }
            match self.framer.next_frame() {
                Ok(Some(frame)) => {
                    if let Err(reason) = self.handle_frame(frame.as_bytes()) {
                        self.resync(reason);
                    }
                }
                Ok(None) => return,
                Err(_) => self.resync("Bad message size."),
            }
        }
    }

    fn on_sync(&mut self, type_id: u8) {
        debug!("synchronized with sensor type {}", type_id);
        self.sensor_type = type_id;
        self.num_modes = 0;
        self.num_view_modes = 0;
        self.current_mode = 0;
        self.data_error_count = 0;
        self.last_data_seen = false;
        for slot in &mut self.mode_info {
            *slot = ModeInfo::default();
        }
        self.info_flags = InfoFlags::CMD_TYPE;
        self.phase = Phase::Collecting;
    }

    fn handle_frame(&mut self, frame: &[u8]) -> Result<(), &'static str> {
        let header = frame[0];
        let class = MessageClass::of(header);
        if class == MessageClass::Sys {
            if header == SYS_ACK {
                return self.on_ack();
            }
            return Ok(());
        }
        let (body, declared) = frame.split_at(frame.len() - 1);
        if frame_checksum(body) != declared[0] {
            return self.on_bad_checksum(class, frame);
        }
        match (self.phase, class) {
            (Phase::Collecting, MessageClass::Cmd) => {
                self.on_cmd(header & MSG_CMD_MASK, &frame[1..frame.len() - 1])
            }
            (Phase::Collecting, MessageClass::Info) => {
                self.on_info(header & MSG_CMD_MASK, frame[1], &frame[2..frame.len() - 1])
            }
            (Phase::Collecting, MessageClass::Data) => {
                Err("Received DATA before the handshake completed.")
            }
            (Phase::Running, MessageClass::Data) => {
                self.on_data(header & MSG_CMD_MASK, &frame[1..frame.len() - 1])
            }
            (Phase::Running, _) => Err("Unexpected command."),
            // Stale handshake traffic while a delayed action is pending.
            _ => Ok(()),
        }
    }

    fn on_bad_checksum(&mut self, class: MessageClass, frame: &[u8]) -> Result<(), &'static str> {
        match self.phase {
            Phase::Running => {
                // The EV3 color sensor ships RGB-RAW frames with broken
                // checksums; they are recognizable by their first
                // payload byte and accepted as-is.
                if class == MessageClass::Data
                    && self.sensor_type == TYPE_EV3_COLOR
                    && frame[1] == 0xDC
                {
                    return self.on_data(frame[0] & MSG_CMD_MASK, &frame[1..frame.len() - 1]);
                }
                self.count_data_error("Bad checksum.")
            }
            Phase::AckPending | Phase::BaudSwitching => Ok(()),
            _ => Err("Bad checksum."),
        }
    }

    fn count_data_error(&mut self, reason: &'static str) -> Result<(), &'static str> {
        self.data_error_count += 1;
        if self.data_error_count >= MAX_DATA_ERRORS {
            Err(reason)
        } else {
            Ok(())
        }
    }

    fn on_ack(&mut self) -> Result<(), &'static str> {
        if self.phase != Phase::Collecting {
            return Ok(());
        }
        if !self.info_flags.contains(InfoFlags::REQUIRED) || self.num_modes == 0 {
            return Err("Received ACK before all required INFO.");
        }
        self.ack_timer.arm(self.clock.now(), ACK_DELAY);
        self.phase = Phase::AckPending;
        Ok(())
    }

    fn on_cmd(&mut self, cmd: u8, payload: &[u8]) -> Result<(), &'static str> {
        match cmd {
            CMD_MODES => {
                if self.info_flags.contains(InfoFlags::CMD_MODES) {
                    return Err("Received duplicate modes INFO.");
                }
                // The wire carries both counts minus one.
                let modes = usize::from(payload[0]) + 1;
                if modes > MAX_MODES {
                    return Err("Invalid number of modes.");
                }
                self.num_modes = modes as u8;
                self.num_view_modes = if payload.len() > 1 {
                    payload[1].wrapping_add(1)
                } else {
                    self.num_modes
                };
                self.info_flags |= InfoFlags::CMD_MODES;
                trace!("sensor declares {} modes", self.num_modes);
                Ok(())
            }
            CMD_SPEED => {
                if self.info_flags.contains(InfoFlags::CMD_SPEED) {
                    return Err("Received duplicate speed INFO.");
                }
                if payload.len() < 4 {
                    return Err("Invalid speed INFO.");
                }
                let baud = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
                if !(MIN_BAUD_RATE..=MAX_BAUD_RATE).contains(&baud) {
                    return Err("Invalid baud rate.");
                }
                self.new_baud_rate = baud;
                self.info_flags |= InfoFlags::CMD_SPEED;
                trace!("sensor requests {} baud", baud);
                Ok(())
            }
            _ => Err("Unexpected command."),
        }
    }

    fn on_info(&mut self, mode: u8, subcmd: u8, payload: &[u8]) -> Result<(), &'static str> {
        if self.info_flags.contains(InfoFlags::CMD_MODES) && mode >= self.num_modes {
            return Err("Invalid mode.");
        }
        match subcmd {
            INFO_NAME => {
                if payload.is_empty() || !payload[0].is_ascii_graphic() {
                    return Err("Invalid name INFO.");
                }
                // A NAME record opens a new mode: its optional records
                // start over.
                self.info_flags.remove(InfoFlags::MODE_RECORDS);
                copy_wire_string(&mut self.mode_info[usize::from(mode)].name, payload);
                self.current_mode = mode;
                self.info_flags |= InfoFlags::INFO_NAME;
                trace!(
                    "mode {} is named {}",
                    mode,
                    self.mode_info[usize::from(mode)].name
                );
                Ok(())
            }
            INFO_RAW | INFO_PCT | INFO_SI => {
                if mode != self.current_mode {
                    return Err("Received INFO for incorrect mode.");
                }
                if payload.len() < 8 {
                    return Err("Invalid scaling INFO.");
                }
                let min = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
                let max = u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
                let slot = &mut self.mode_info[usize::from(mode)];
                let flag = match subcmd {
                    INFO_RAW => {
                        if self.info_flags.contains(InfoFlags::INFO_RAW) {
                            return Err("Received duplicate raw scaling INFO.");
                        }
                        slot.raw_min = min;
                        slot.raw_max = max;
                        InfoFlags::INFO_RAW
                    }
                    INFO_PCT => {
                        if self.info_flags.contains(InfoFlags::INFO_PCT) {
                            return Err("Received duplicate percent scaling INFO.");
                        }
                        slot.pct_min = min;
                        slot.pct_max = max;
                        InfoFlags::INFO_PCT
                    }
                    _ => {
                        if self.info_flags.contains(InfoFlags::INFO_SI) {
                            return Err("Received duplicate SI scaling INFO.");
                        }
                        slot.si_min = min;
                        slot.si_max = max;
                        InfoFlags::INFO_SI
                    }
                };
                self.info_flags |= flag;
                Ok(())
            }
            INFO_UNITS => {
                if mode != self.current_mode {
                    return Err("Received INFO for incorrect mode.");
                }
                if self.info_flags.contains(InfoFlags::INFO_UNITS) {
                    return Err("Received duplicate units INFO.");
                }
                copy_wire_string(&mut self.mode_info[usize::from(mode)].units, payload);
                self.info_flags |= InfoFlags::INFO_UNITS;
                Ok(())
            }
            INFO_FORMAT => {
                if mode != self.current_mode {
                    return Err("Received INFO for incorrect mode.");
                }
                if self.info_flags.contains(InfoFlags::INFO_FORMAT) {
                    return Err("Received duplicate format INFO.");
                }
                if payload.len() < 2 {
                    return Err("Invalid format INFO.");
                }
                let data_sets = payload[0];
                let format =
                    DataFormat::from_wire(payload[1]).ok_or("Invalid data format.")?;
                if data_sets == 0 || usize::from(data_sets) * format.size() > RAW_DATA_SIZE {
                    return Err("Invalid number of data sets.");
                }
                self.info_flags |= InfoFlags::INFO_FORMAT;
                if !self.info_flags.contains(InfoFlags::REQUIRED) {
                    return Err("Did not receive all required INFO.");
                }
                let slot = &mut self.mode_info[usize::from(mode)];
                slot.data_sets = data_sets;
                slot.format = format;
                if let Some(&figures) = payload.get(2) {
                    slot.figures = figures;
                }
                if let Some(&decimals) = payload.get(3) {
                    slot.decimals = decimals;
                }
                trace!("mode {} carries {} data sets", mode, data_sets);
                // Records arrive highest mode first; step down to the
                // one described next.
                if self.current_mode > 0 {
                    self.current_mode -= 1;
                }
                Ok(())
            }
            _ => Err("Unknown INFO message."),
        }
    }

    fn on_data(&mut self, mode: u8, payload: &[u8]) -> Result<(), &'static str> {
        if mode >= self.num_modes {
            return Err("Invalid mode.");
        }
        self.mode_info[usize::from(mode)].store_sample(payload);
        if mode != self.current_mode {
            self.current_mode = mode;
            debug!("sensor confirmed mode {}", mode);
            self.publisher.mode_changed(mode);
        }
        self.publisher
            .sample_ready(mode, self.mode_info[usize::from(mode)].raw_data());
        self.last_data_seen = true;
        self.data_error_count = self.data_error_count.saturating_sub(1);
        Ok(())
    }

    fn finish_handshake(&mut self) {
        if self.phase != Phase::AckPending {
            return;
        }
        if !self.last_error.is_empty() {
            warn!("link recovered after resync: {}", self.last_error);
            self.last_error = "";
        }
        if self.registered && self.registered_type != self.sensor_type {
            self.publisher.sensor_detached();
            self.registered = false;
        }
        if !self.registered {
            self.publisher
                .sensor_attached(self.sensor_type, &self.mode_info[..usize::from(self.num_modes)]);
            self.registered = true;
            self.registered_type = self.sensor_type;
        }
        info!(
            "sensor type {} ready with {} modes",
            self.sensor_type, self.num_modes
        );
        if let Err(e) = self.transport.write_all(&[SYS_ACK]) {
            warn!("failed to send handshake ACK: {:?}", e);
        }
        self.baud_timer.arm(self.clock.now(), BAUD_DELAY);
        self.phase = Phase::BaudSwitching;
    }

    fn apply_baud_change(&mut self) {
        if self.phase == Phase::BaudSwitching {
            debug!("switching line to {} baud", self.new_baud_rate);
            if let Err(e) = self.transport.set_baud_rate(self.new_baud_rate) {
                warn!("failed to switch line speed: {:?}", e);
            }
            self.phase = Phase::Running;
            self.watchdog.start(self.clock.now(), KEEPALIVE_PERIOD / 2);
        } else {
            // Restore the handshake speed after a resynchronization.
            if let Err(e) = self.transport.set_baud_rate(MIN_BAUD_RATE) {
                warn!("failed to restore handshake speed: {:?}", e);
            }
            if let Err(e) = self.transport.discard_input() {
                warn!("failed to flush stale input: {:?}", e);
            }
        }
    }

    /// Runs one keep-alive period; the return value is the restart
    /// verdict for the watchdog.
    fn keepalive_tick(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        if !self.last_data_seen {
            self.data_error_count += 1;
            debug!(
                "keep-alive window passed with no data ({} errors)",
                self.data_error_count
            );
            if self.data_error_count >= MAX_DATA_ERRORS {
                self.resync("Keep-alive timeout.");
                return false;
            }
        }
        self.last_data_seen = false;
        if let Err(e) = self.transport.write_all(&[SYS_NACK]) {
            warn!("failed to send keep-alive probe: {:?}", e);
        }
        true
    }

    fn resync(&mut self, reason: &'static str) {
        warn!("lost synchronization: {}", reason);
        self.phase = Phase::Failing;
        self.last_error = reason;
        self.ack_timer.cancel();
        self.watchdog.stop();
        self.framer.clear();
        self.sensor_type = TYPE_UNKNOWN;
        self.new_baud_rate = MIN_BAUD_RATE;
        self.data_error_count = 0;
        self.last_data_seen = false;
        self.baud_timer.arm(self.clock.now(), BAUD_DELAY);
        self.phase = Phase::Unsynced;
    }
}

fn copy_wire_string<const N: usize>(dst: &mut String<N>, payload: &[u8]) {
    dst.clear();
    for &b in payload {
        if b == 0 {
            break;
        }
        if dst.push(b as char).is_err() {
            break;
        }
    }
}
