use core::fmt;

use super::pair::PortId;

/// Why a received wire word was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordError {
    /// Start bit was 1.
    StartBit,
    /// Stop bit was 0.
    StopBit,
    /// Data plus parity bit had an even number of ones.
    Parity,
}

impl fmt::Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartBit => write!(f, "start bit not low"),
            Self::StopBit => write!(f, "stop bit not high"),
            Self::Parity => write!(f, "odd parity check failed"),
        }
    }
}

/// Errors reported to the application by the PS/2 ports.
///
/// Wire-level faults never show up here: the engine recovers from those on
/// its own and only counts them in [`super::Ps2Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ps2Error {
    /// The outbound queue of `port` has no room; the byte was not buffered.
    QueueFull { port: PortId },
    /// `port` is parked while a directed write to the other port completes.
    PortBusy { port: PortId },
    /// `port` was disabled by the application and will not transmit.
    PortDisabled { port: PortId },
    /// A configured duration is outside the range a deadline can represent.
    TimeoutOutOfRange { micros: u16 },
}

impl fmt::Display for Ps2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull { port } => write!(f, "{} outbound queue full", port),
            Self::PortBusy { port } => {
                write!(f, "{} parked for a write to the other port", port)
            }
            Self::PortDisabled { port } => write!(f, "{} is disabled", port),
            Self::TimeoutOutOfRange { micros } => {
                write!(f, "timeout of {}us out of range", micros)
            }
        }
    }
}

/// Convenience result type for PS/2 port operations.
pub type Ps2Result<T = ()> = Result<T, Ps2Error>;
