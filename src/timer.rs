//! Time source capability and the session's deadline bookkeeping.
//!
//! The engine never reads a hardware clock itself. The host supplies a
//! [`Clock`] when it opens a session, and drives elapsed time into the
//! engine by calling `poll()`; tests hand in a stepped clock and walk
//! it forward deterministically.
//!
//! Three deadlines exist: the one-shot ACK reply, the one-shot
//! baud-rate change (also reused for the 2400-baud restore after a
//! resynchronization), and the recurring keep-alive watchdog. All are
//! plain data — cancelling one clears a field, which makes cancellation
//! synchronous and teardown free of rendezvous.

use core::ops::Add;
use core::time::Duration;

/// Monotonic time source with millisecond resolution.
///
/// Implementations only need to be monotonic for the lifetime of a
/// session; the engine compares instants and never subtracts across a
/// teardown.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// A point in monotonic time, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// Creates an instant from a millisecond count.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// The instant as a millisecond count.
    pub const fn as_millis(self) -> u64 {
        self.millis
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant {
            millis: self.millis + rhs.as_millis() as u64,
        }
    }
}

/// A single-slot delayed action.
///
/// Arming an already-armed slot replaces the deadline, so at most one
/// instance of the action is ever pending.
#[derive(Debug, Default)]
pub(crate) struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    /// Schedules the action `delay` after `now`.
    pub(crate) fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Clears any pending deadline.
    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consumes the deadline if it has come due.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The recurring keep-alive deadline.
///
/// Firing consumes the deadline; the handler decides whether to rearm,
/// which gives it the no-restart verdict the protocol needs when the
/// session leaves the streaming phase. Rearming measures from "now",
/// so a late poll does not bunch up missed ticks.
#[derive(Debug)]
pub(crate) struct Watchdog {
    deadline: Option<Instant>,
    period: Duration,
}

impl Watchdog {
    pub(crate) const fn new(period: Duration) -> Self {
        Self {
            deadline: None,
            period,
        }
    }

    /// Starts the schedule with a first deadline `initial` after `now`.
    pub(crate) fn start(&mut self, now: Instant, initial: Duration) {
        self.deadline = Some(now + initial);
    }

    /// Stops the schedule.
    pub(crate) fn stop(&mut self) {
        self.deadline = None;
    }

    /// Consumes the deadline if it has come due.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Schedules the next tick one period after `now`.
    pub(crate) fn rearm(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_at_its_deadline() {
        let mut slot = OneShot::default();
        slot.arm(Instant::from_millis(0), Duration::from_millis(10));
        assert!(!slot.fire(Instant::from_millis(9)));
        assert!(slot.fire(Instant::from_millis(10)));
        assert!(!slot.fire(Instant::from_millis(11)));
    }

    #[test]
    fn rearming_replaces_the_pending_deadline() {
        let mut slot = OneShot::default();
        slot.arm(Instant::from_millis(0), Duration::from_millis(10));
        slot.arm(Instant::from_millis(5), Duration::from_millis(10));
        assert!(!slot.fire(Instant::from_millis(10)));
        assert!(slot.fire(Instant::from_millis(15)));
    }

    #[test]
    fn cancelled_slots_never_fire() {
        let mut slot = OneShot::default();
        slot.arm(Instant::from_millis(0), Duration::from_millis(10));
        slot.cancel();
        assert!(!slot.fire(Instant::from_millis(100)));
    }

    #[test]
    fn watchdog_reschedules_from_the_current_tick() {
        let mut dog = Watchdog::new(Duration::from_millis(100));
        dog.start(Instant::from_millis(0), Duration::from_millis(50));
        assert!(!dog.fire(Instant::from_millis(49)));
        assert!(dog.fire(Instant::from_millis(50)));

        // Polled late: the next deadline counts from the late tick.
        dog.rearm(Instant::from_millis(170));
        assert!(!dog.fire(Instant::from_millis(269)));
        assert!(dog.fire(Instant::from_millis(270)));
    }

    #[test]
    fn stopped_watchdog_stays_silent() {
        let mut dog = Watchdog::new(Duration::from_millis(100));
        dog.start(Instant::from_millis(0), Duration::from_millis(50));
        dog.stop();
        assert!(!dog.fire(Instant::from_millis(1_000)));
    }
}
