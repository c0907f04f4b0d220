//! PS/2 port engine.
//!
//! One [`Ps2Port`] per physical connector. It owns the receive and transmit
//! state machines, the two byte queues, and the deadline that bounds every
//! wait. Two stimuli drive it:
//!
//! - clock edges, via [`Ps2Port::on_edge`] / [`Ps2Port::on_pin_change`] from
//!   a pin-change ISR, or sampled by [`Ps2Port::service`] in polled mode;
//! - elapsed time, checked by [`Ps2Port::service`] from the main loop.
//!
//! # Sharing with an ISR
//!
//! Every method takes `&mut self`. When the ISR and the main loop both touch a
//! port, keep it in an [`nio_lib::IrqMutex`]; each call then runs with
//! interrupts masked, which is the only critical section the engine needs.
//!
//! ```ignore
//! static KBD: IrqMutex<Option<Ps2Port<BoardLines, BoardTimer>>> = IrqMutex::new(None);
//!
//! fn pcint_isr() {
//!     if let Some(port) = KBD.lock().as_mut() {
//!         port.on_pin_change();
//!     }
//! }
//! ```

use nio_lib::{Deadline, RingBuffer, Timebase, klog_debug};

use super::config::Ps2Config;
use super::lines::{Edge, Level, Ps2Lines};
use super::stats::Ps2Stats;
use super::word::START_BIT;
use super::{IN_BUFFER_SIZE, OUT_BUFFER_SIZE, Ps2Result};

/// Top-level state of a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ps2State {
    /// Lines released, waiting for a start bit or for queued output.
    Idle,
    /// Clocking in a word from the device.
    ReadingWord,
    /// Clocking out a word to the device; see [`WriteState`].
    WritingWord,
    /// Inbound queue full; clock held low until the application reads.
    BufferFull,
    /// Parked by the application; clock held low.
    Disabled,
}

/// Progress of a host-to-device transfer. Only meaningful in
/// [`Ps2State::WritingWord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteState {
    /// Clock held low to request to send.
    HoldingClock,
    /// Waiting for the device to pull the clock low; the next bit goes out then.
    WaitClockLow,
    /// Waiting for the device to release the clock; it samples the bit then.
    WaitClockHigh,
    /// All bits out, data released; waiting for the device's ACK on data.
    WaitDataLow,
    /// Waiting for the ACK clock pulse.
    WaitFinalClockLow,
    /// Waiting for the device to release both lines.
    WaitForRelease,
}

/// Who the engine is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TimeoutKind {
    /// A minimum duration the engine imposes on itself. Expiry means "go on".
    Internal,
    /// A bound on how long the device may take. Expiry is a failure.
    External,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Timeout {
    pub(super) deadline: Deadline,
    pub(super) kind: TimeoutKind,
}

/// Cursor value pointing at the start bit.
pub(super) const FIRST_BIT_MASK: u16 = 1 << START_BIT;

pub struct Ps2Port<L, T> {
    pub(super) lines: L,
    pub(super) timebase: T,
    pub(super) config: Ps2Config,
    pub(super) state: Ps2State,
    pub(super) write_state: WriteState,
    pub(super) current_word: u16,
    pub(super) bit_mask: u16,
    pub(super) last_clock: Level,
    pub(super) timeout: Option<Timeout>,
    pub(super) in_buffer: RingBuffer<u8, IN_BUFFER_SIZE>,
    pub(super) out_buffer: RingBuffer<u8, OUT_BUFFER_SIZE>,
    pub(super) stats: Ps2Stats,
}

impl<L: Ps2Lines, T: Timebase> Ps2Port<L, T> {
    /// Bind a port to its lines with the default configuration.
    pub fn new(lines: L, timebase: T) -> Self {
        let mut port = Self {
            lines,
            timebase,
            config: Ps2Config::new(),
            state: Ps2State::Idle,
            write_state: WriteState::HoldingClock,
            current_word: 0,
            bit_mask: FIRST_BIT_MASK,
            last_clock: Level::High,
            timeout: None,
            in_buffer: RingBuffer::new_with(0),
            out_buffer: RingBuffer::new_with(0),
            stats: Ps2Stats::new(),
        };
        port.release_lines();
        port.last_clock = port.lines.clock();
        port
    }

    /// Bind a port with an explicit configuration.
    pub fn with_config(lines: L, timebase: T, config: Ps2Config) -> Ps2Result<Self> {
        config.validate()?;
        let mut port = Self::new(lines, timebase);
        port.config = config;
        Ok(port)
    }

    // =========================================================================
    // Application interface
    // =========================================================================

    /// Are we currently talking to the device (reading or writing a word)?
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, Ps2State::ReadingWord | Ps2State::WritingWord)
    }

    /// Advance deadlines and the transmit handshake, then pop the oldest
    /// received byte.
    pub fn poll(&mut self) -> Option<u8> {
        self.service();
        self.read_byte()
    }

    /// Advance deadlines, edge sampling (polled mode) and the transmit
    /// handshake without draining the inbound queue.
    ///
    /// Call this often: in polled mode well under the ~40µs clock half-period,
    /// otherwise at least every few hundred microseconds.
    pub fn service(&mut self) {
        if self.config.mode == super::IntegrationMode::Polled {
            self.sample_clock();
        }
        match self.state {
            Ps2State::Idle => self.start_write_if_pending(),
            Ps2State::ReadingWord => self.check_receive_timeout(),
            Ps2State::WritingWord => self.advance_write(),
            Ps2State::BufferFull | Ps2State::Disabled => {}
        }
    }

    /// Queue a byte for the device. Returns false (and buffers nothing) if the
    /// outbound queue is full.
    ///
    /// The transfer starts from `service` once the port is idle, so a write
    /// queued mid-receive waits for the word to finish.
    pub fn enqueue_write(&mut self, byte: u8) -> bool {
        self.out_buffer.try_push(byte)
    }

    /// Pop the oldest received byte.
    ///
    /// Draining an entry while the bus is inhibited for backpressure releases
    /// the clock so the device may send again.
    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.in_buffer.try_pop()?;
        if self.state == Ps2State::BufferFull {
            self.release_lines();
            self.enter_idle();
            klog_debug!("PS/2: inbound queue drained, bus released");
        }
        Some(byte)
    }

    /// Hold the clock low and park the port. Aborts any word in progress; an
    /// in-flight outbound byte is discarded.
    pub fn disable(&mut self) {
        if self.state == Ps2State::WritingWord {
            self.discard_in_flight();
        }
        self.lines.release_data();
        self.lines.hold_clock_low();
        self.reset_word();
        self.timeout = None;
        self.state = Ps2State::Disabled;
    }

    /// Release the lines and return to Idle, dropping any partial word.
    ///
    /// Coming back from [`Ps2State::Disabled`] also clears both queues, so the
    /// port restarts from a clean slate. An in-flight outbound byte is
    /// discarded. A port inhibited by a full inbound queue stays inhibited:
    /// only [`Ps2Port::read_byte`] makes room and releases the bus.
    pub fn enable(&mut self) {
        match self.state {
            Ps2State::Disabled => {
                self.in_buffer.reset();
                self.out_buffer.reset();
            }
            Ps2State::WritingWord => self.discard_in_flight(),
            Ps2State::BufferFull => return,
            Ps2State::Idle | Ps2State::ReadingWord => {}
        }
        self.release_lines();
        self.enter_idle();
    }

    // =========================================================================
    // Edge input
    // =========================================================================

    /// Feed one clock edge together with the data level sampled at it.
    ///
    /// Intended for ISRs that know the edge direction.
    pub fn on_edge(&mut self, edge: Edge, data: Level) {
        self.last_clock = edge.level();
        if self.state == Ps2State::ReadingWord {
            // A stale partial word must not swallow the start of the next one.
            self.check_receive_timeout();
        }
        match self.state {
            Ps2State::Idle => {
                if edge == Edge::Falling {
                    self.begin_word(data);
                }
            }
            Ps2State::ReadingWord => {
                if edge == Edge::Falling {
                    self.read_bit(data);
                }
            }
            Ps2State::WritingWord => self.advance_write(),
            // We hold the clock ourselves; any edge seen here is our own.
            Ps2State::BufferFull | Ps2State::Disabled => {}
        }
    }

    /// Handle a pin-change interrupt on the clock pin that does not report the
    /// direction: compare against the last seen level to find the edge.
    pub fn on_pin_change(&mut self) {
        let clock = self.lines.clock();
        if clock == self.last_clock {
            if self.state == Ps2State::WritingWord {
                self.advance_write();
            }
            return;
        }
        let edge = if clock.is_low() {
            Edge::Falling
        } else {
            Edge::Rising
        };
        let data = self.lines.data();
        self.on_edge(edge, data);
    }

    fn sample_clock(&mut self) {
        let clock = self.lines.clock();
        if clock == self.last_clock {
            return;
        }
        let edge = if clock.is_low() {
            Edge::Falling
        } else {
            Edge::Rising
        };
        let data = self.lines.data();
        self.on_edge(edge, data);
    }

    // =========================================================================
    // Debug accessors
    // =========================================================================

    pub fn state(&self) -> Ps2State {
        self.state
    }

    pub fn write_state(&self) -> WriteState {
        self.write_state
    }

    /// Received bytes waiting for `read_byte`.
    pub fn pending_reads(&self) -> usize {
        self.in_buffer.len()
    }

    /// Bytes waiting to go out, including one in flight.
    pub fn pending_writes(&self) -> usize {
        self.out_buffer.len()
    }

    pub fn stats(&self) -> &Ps2Stats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = Ps2Stats::new();
    }

    pub fn config(&self) -> &Ps2Config {
        &self.config
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    #[inline]
    pub(super) fn now(&self) -> u16 {
        self.timebase.micros()
    }

    /// Arm the deadline `micros` from now.
    #[inline]
    pub(super) fn arm(&mut self, micros: u16, kind: TimeoutKind) {
        self.timeout = Some(Timeout {
            deadline: Deadline::after(self.now(), micros),
            kind,
        });
    }

    /// Kind of the armed deadline if it has passed. A missing deadline counts
    /// as a passed external one so that a wait can never hang.
    #[inline]
    pub(super) fn expired(&self) -> Option<TimeoutKind> {
        match self.timeout {
            Some(timeout) if !timeout.deadline.has_expired(self.now()) => None,
            Some(timeout) => Some(timeout.kind),
            None => Some(TimeoutKind::External),
        }
    }

    #[inline]
    pub(super) fn reset_word(&mut self) {
        self.current_word = 0;
        self.bit_mask = FIRST_BIT_MASK;
    }

    pub(super) fn release_lines(&mut self) {
        self.lines.release_clock();
        self.lines.release_data();
    }

    /// Back to Idle with a clean accumulator and no deadline armed.
    pub(super) fn enter_idle(&mut self) {
        self.reset_word();
        self.timeout = None;
        self.state = Ps2State::Idle;
        self.write_state = WriteState::HoldingClock;
        self.last_clock = self.lines.clock();
    }
}
