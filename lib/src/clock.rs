//! Wrapping 16-bit microsecond timebase and deadlines.
//!
//! The controller's timer is a free-running microsecond counter truncated to
//! 16 bits, so it wraps every 65536µs. Deadlines are compared with
//! `(deadline - now) as i16 <= 0`, which stays correct across the wrap as long
//! as a deadline is never armed more than half the counter range (32768µs)
//! ahead and is checked at least once every 32768µs after it was armed.
//! [`MAX_DEADLINE_US`] keeps a margin below that window.

/// Longest duration a [`Deadline`] may be armed for.
pub const MAX_DEADLINE_US: u16 = 32_000;

/// Source of the current time in microseconds, truncated to 16 bits.
pub trait Timebase {
    fn micros(&self) -> u16;
}

impl<T: Timebase + ?Sized> Timebase for &T {
    #[inline]
    fn micros(&self) -> u16 {
        (**self).micros()
    }
}

/// An absolute point on the wrapping microsecond counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline(u16);

impl Deadline {
    /// Deadline `micros` after `now`.
    ///
    /// `micros` must not exceed [`MAX_DEADLINE_US`]; longer durations alias
    /// with the past once wrapped and would expire immediately.
    #[inline]
    pub const fn after(now: u16, micros: u16) -> Self {
        Deadline(now.wrapping_add(micros))
    }

    #[inline]
    pub const fn at(self) -> u16 {
        self.0
    }

    /// Signed distance in microseconds from `now` to the deadline.
    /// Zero or negative once the deadline has passed.
    #[inline]
    pub const fn remaining(self, now: u16) -> i16 {
        self.0.wrapping_sub(now) as i16
    }

    #[inline]
    pub const fn has_expired(self, now: u16) -> bool {
        self.remaining(now) <= 0
    }
}
