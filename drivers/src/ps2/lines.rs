//! Electrical view of a PS/2 port: the clock and data lines.
//!
//! Both lines are open-collector with pull-ups. "Releasing" a line turns the
//! pin into a pulled-up input, so the line reads high unless the device pulls
//! it low. The engine never drives a line high.

/// Logic level sampled on a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Clock transition observed by the edge detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    /// High to low. Data is valid on this edge.
    Falling,
    /// Low to high.
    Rising,
}

impl Edge {
    /// Clock level right after the transition.
    #[inline]
    pub const fn level(self) -> Level {
        match self {
            Edge::Falling => Level::Low,
            Edge::Rising => Level::High,
        }
    }
}

/// Board binding for one PS/2 port.
///
/// Implemented by the platform layer over two GPIO pins, and by the
/// simulated wire in the scenario tests. An implementation must be cheap
/// enough to call from the edge interrupt.
pub trait Ps2Lines {
    fn clock(&self) -> Level;
    fn data(&self) -> Level;

    /// Switch the clock pin to output and drive it low (inhibit).
    fn hold_clock_low(&mut self);
    /// Switch the clock pin back to a pulled-up input.
    fn release_clock(&mut self);

    /// Switch the data pin to output and drive it low.
    fn drive_data_low(&mut self);
    /// Switch the data pin back to a pulled-up input.
    fn release_data(&mut self);

    /// Present `level` on the data line: low is driven, high is released.
    #[inline]
    fn set_data(&mut self, level: Level) {
        match level {
            Level::Low => self.drive_data_low(),
            Level::High => self.release_data(),
        }
    }
}
