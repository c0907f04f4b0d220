use core::fmt;

/// Wire health counters for one port.
///
/// The engine recovers from every wire fault by itself; these counters are the
/// only trace of them. All counters saturate.
///
/// ```ignore
/// klog_info!("kbd health: {}", port.stats());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ps2Stats {
    pub bytes_received: u32,
    /// Words dropped for a bad start, stop or parity bit.
    pub framing_errors: u32,
    /// Words abandoned because the device stopped clocking mid-word.
    pub receive_timeouts: u32,
    /// Valid words dropped because the inbound queue had no room.
    pub overruns: u32,
    pub bytes_sent: u32,
    /// Host-to-device transfers that did not complete the ACK handshake.
    pub transmit_aborts: u32,
    /// Times the port inhibited the bus because the inbound queue filled up.
    pub inhibits: u32,
}

impl Ps2Stats {
    pub const fn new() -> Self {
        Self {
            bytes_received: 0,
            framing_errors: 0,
            receive_timeouts: 0,
            overruns: 0,
            bytes_sent: 0,
            transmit_aborts: 0,
            inhibits: 0,
        }
    }
}

impl fmt::Display for Ps2Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rx={} framing={} rx_timeouts={} overruns={} tx={} tx_aborts={} inhibits={}",
            self.bytes_received,
            self.framing_errors,
            self.receive_timeouts,
            self.overruns,
            self.bytes_sent,
            self.transmit_aborts,
            self.inhibits
        )
    }
}
