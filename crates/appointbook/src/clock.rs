//! Sources of "now" for the booking rules.
//!
//! All comparisons happen in local wall-clock time, so clocks hand out
//! naive date-times.

use chrono::{Local, NaiveDateTime};

/// Trait for anything that can tell the current wall-clock moment.
pub trait Clock: std::fmt::Debug {
    /// The current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// The system clock, read in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a given moment.
///
/// Used for reproducible sessions (`appt session --now ...`) and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Move the clock forward (or backward) by `delta`.
    pub fn advance(&mut self, delta: chrono::Duration) {
        self.0 += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

impl Clock for Box<dyn Clock> {
    fn now(&self) -> NaiveDateTime {
        self.as_ref().now()
    }
}
