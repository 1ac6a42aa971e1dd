//! # ev3-uart
//!
//! A portable, no_std protocol engine for LEGO MINDSTORMS EV3 UART
//! sensors, the auto-identifying sensors that describe themselves over
//! a raw serial link before streaming measurements.
//!
//! The engine sits between a serial byte stream and whatever sensor
//! registry the host publishes devices through. It owns the whole
//! protocol lifecycle:
//!
//! - synchronizing with a freshly powered sensor at 2400 baud
//! - receiving and validating the self-describing mode catalog
//! - acknowledging the handshake and moving the line to the sensor's
//!   requested speed
//! - consuming measurement frames and probing the link with periodic
//!   keep-alive traffic
//! - detecting link failure and resetting for the sensor's handshake
//!   restart
//!
//! ## Crate features
//! | Feature | Description |
//! |---------|-------------|
//! | `std`   | Enables `std` for the error, logging, and I/O trait dependencies; the engine itself never allocates |
//!
//! ## Architecture
//!
//! The engine is passive and single-threaded: the host pushes received
//! bytes into [`Session::receive`](session::Session::receive) and calls
//! [`Session::poll`](session::Session::poll) from its event loop to
//! fire the handshake delays and the keep-alive watchdog. Three
//! capability traits connect it to the outside world:
//!
//! - [`transport::Transport`] — the serial line (byte sink plus
//!   baud-rate control)
//! - [`publish::Publisher`] — upstream attach/detach/mode/sample
//!   notifications
//! - [`timer::Clock`] — the monotonic time source behind `poll`
//!
//! ## Usage
//!
//! ```rust
//! use ev3_uart::session::{Phase, Session};
//! use ev3_uart::timer::{Clock, Instant};
//! use ev3_uart::transport::Transport;
//! # use core::convert::Infallible;
//! # struct Port { baud: u32 }
//! # impl embedded_io::ErrorType for Port { type Error = Infallible; }
//! # impl embedded_io::Write for Port {
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # impl Transport for Port {
//! #     fn set_baud_rate(&mut self, baud: u32) -> Result<(), Infallible> { self.baud = baud; Ok(()) }
//! #     fn discard_input(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct Ticks;
//! # impl Clock for Ticks { fn now(&self) -> Instant { Instant::from_millis(0) } }
//!
//! fn main() {
//!     let port = Port { baud: 2400 };
//!     let mut session = Session::new(port, (), Ticks);
//!
//!     // Bytes from the serial line, in whatever pieces it delivers them.
//!     session.receive(&[0x40, 0x10, 0xAF]); // a touch sensor announcing itself
//!     assert_eq!(session.phase(), Phase::Collecting);
//!
//!     // Fire due timers from the host's event loop.
//!     session.poll();
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - One `Session` serves one link; attach a fresh session per port.
//! - `poll()` needs to run at least every few milliseconds during the
//!   handshake window and once per keep-alive period afterwards.
//! - All entry points take `&mut self`; hosts delivering bytes from
//!   interrupt context serialize access with whatever mutual exclusion
//!   they already use for the line itself.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded
//! environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub(crate) mod checksum;
pub mod codec;
pub mod consts;
pub mod error;
pub(crate) mod framer;
pub mod modes;
pub mod publish;
pub mod session;
pub mod timer;
pub mod transport;

#[cfg(test)]
mod tests {

    #[cfg(all(test, feature = "std"))]
    mod scenarios {
        use crate::checksum::frame_checksum;
        use crate::codec::{CMD_WRITE, MessageClass, SYS_ACK, encode_header};
        use crate::consts::MIN_BAUD_RATE;
        use crate::publish::Publisher;
        use crate::session::{Phase, Session};
        use crate::timer::{Clock, Instant};
        use crate::transport::Transport;
        use core::cell::{Cell, RefCell};
        use core::convert::Infallible;
        use std::rc::Rc;

        #[derive(Default)]
        struct PortState {
            written: Vec<u8>,
            bauds: Vec<u32>,
        }

        #[derive(Clone, Default)]
        struct ScriptPort(Rc<RefCell<PortState>>);

        impl embedded_io::ErrorType for ScriptPort {
            type Error = Infallible;
        }

        impl embedded_io::Write for ScriptPort {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
                self.0.borrow_mut().written.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> Result<(), Infallible> {
                Ok(())
            }
        }

        impl Transport for ScriptPort {
            fn set_baud_rate(&mut self, baud: u32) -> Result<(), Infallible> {
                self.0.borrow_mut().bauds.push(baud);
                Ok(())
            }

            fn discard_input(&mut self) -> Result<(), Infallible> {
                Ok(())
            }
        }

        #[derive(Clone, Default)]
        struct SteppedClock(Rc<Cell<u64>>);

        impl SteppedClock {
            fn advance(&self, millis: u64) {
                self.0.set(self.0.get() + millis);
            }
        }

        impl Clock for SteppedClock {
            fn now(&self) -> Instant {
                Instant::from_millis(self.0.get())
            }
        }

        #[derive(Clone, Default)]
        struct SampleLog(Rc<RefCell<Vec<u8>>>);

        impl Publisher for SampleLog {
            fn sample_ready(&mut self, mode: u8, _raw: &[u8]) {
                self.0.borrow_mut().push(mode);
            }
        }

        fn sealed(body: &[u8]) -> Vec<u8> {
            let mut frame = body.to_vec();
            frame.push(frame_checksum(body));
            frame
        }

        /// The full announcement of a one-mode touch-style sensor,
        /// type 16: TYPE, MODES, NAME, FORMAT, then the closing ACK.
        fn touch_sensor_handshake() -> Vec<u8> {
            let mut stream = vec![0x40, 0x10, 0xAF];
            stream.extend_from_slice(&sealed(&[0x49, 0x00, 0x00]));
            stream.extend_from_slice(&sealed(&[
                encode_header(MessageClass::Info, 8, 0),
                0x00,
                b'T',
                b'O',
                b'U',
                b'C',
                b'H',
                0,
                0,
                0,
            ]));
            stream.extend_from_slice(&sealed(&[
                encode_header(MessageClass::Info, 4, 0),
                0x80,
                1,
                0,
                1,
                0,
            ]));
            stream.push(SYS_ACK);
            stream
        }

        struct Rig {
            session: Session<ScriptPort, SampleLog, SteppedClock>,
            port: ScriptPort,
            clock: SteppedClock,
            samples: SampleLog,
        }

        fn rig() -> Rig {
            let port = ScriptPort::default();
            let clock = SteppedClock::default();
            let samples = SampleLog::default();
            Rig {
                session: Session::new(port.clone(), samples.clone(), clock.clone()),
                port,
                clock,
                samples,
            }
        }

        fn settle(rig: &mut Rig) {
            rig.clock.advance(10);
            rig.session.poll();
            rig.clock.advance(10);
            rig.session.poll();
        }

        #[test]
        fn full_handshake_in_a_single_delivery() {
            let mut rig = rig();
            rig.session.receive(&touch_sensor_handshake());
            assert_eq!(rig.session.phase(), Phase::AckPending);

            // The ACK reply leaves after 10 ms, the baud change follows
            // 10 ms later; with no SPEED record the line stays at 2400.
            rig.clock.advance(10);
            rig.session.poll();
            assert_eq!(rig.port.0.borrow().written, vec![SYS_ACK]);
            assert!(rig.port.0.borrow().bauds.is_empty());

            rig.clock.advance(10);
            rig.session.poll();
            assert_eq!(rig.session.phase(), Phase::Running);
            assert_eq!(rig.port.0.borrow().bauds, vec![MIN_BAUD_RATE]);
            assert_eq!(rig.session.type_id(), 0x10);
            assert_eq!(rig.session.modes()[0].name.as_str(), "TOUCH");
        }

        #[test]
        fn handshake_split_one_byte_at_a_time() {
            let mut rig = rig();
            for &b in &touch_sensor_handshake() {
                rig.session.receive(&[b]);
            }
            settle(&mut rig);
            assert_eq!(rig.session.phase(), Phase::Running);
            assert_eq!(rig.session.modes().len(), 1);
        }

        #[test]
        fn split_sync_prefix_is_tolerated() {
            let mut rig = rig();
            rig.session.receive(&[0xFF]);
            rig.session.receive(&[0x40, 0x10, 0xAF]);
            assert_eq!(rig.session.phase(), Phase::Collecting);
            assert_eq!(rig.session.type_id(), 0x10);
        }

        #[test]
        fn measurement_stream_feeds_values_and_notifications() {
            let mut rig = rig();
            rig.session.receive(&touch_sensor_handshake());
            settle(&mut rig);

            rig.session.receive(&[0xC0, 0x2A, 0x15]);
            assert_eq!(rig.session.value(0).unwrap(), 42);
            assert_eq!(rig.session.mode(), 0);
            assert_eq!(*rig.samples.0.borrow(), vec![0]);
        }

        #[test]
        fn checksum_storm_trips_the_link_and_recovery_follows() {
            let mut rig = rig();
            rig.session.receive(&touch_sensor_handshake());
            settle(&mut rig);

            for _ in 0..6 {
                rig.session.receive(&[0xC0, 0x2A, 0x00]);
            }
            assert_eq!(rig.session.phase(), Phase::Unsynced);
            assert_eq!(rig.session.last_error(), "Bad checksum.");

            // 10 ms later the line is back at handshake speed, and the
            // sensor's restarted announcement brings the link up again.
            rig.clock.advance(10);
            rig.session.poll();
            assert_eq!(rig.port.0.borrow().bauds.last(), Some(&MIN_BAUD_RATE));

            rig.session.receive(&touch_sensor_handshake());
            settle(&mut rig);
            assert_eq!(rig.session.phase(), Phase::Running);
            assert_eq!(rig.session.last_error(), "");
        }

        #[test]
        fn write_commands_reach_the_wire_padded_and_sealed() {
            let mut rig = rig();
            rig.session.receive(&touch_sensor_handshake());
            settle(&mut rig);
            rig.port.0.borrow_mut().written.clear();

            rig.session.write(&[0x11, 0x22, 0x33, 0x44, 0x55]).unwrap();
            let state = rig.port.0.borrow();
            let frame = state.written.as_slice();
            assert_eq!(frame.len(), 10);
            assert_eq!(frame[0], encode_header(MessageClass::Cmd, 8, CMD_WRITE));
            assert_eq!(&frame[1..6], &[0x11, 0x22, 0x33, 0x44, 0x55]);
            assert_eq!(&frame[6..9], &[0, 0, 0]);
            assert_eq!(frame[9], frame_checksum(&frame[..9]));
        }
    }
}
