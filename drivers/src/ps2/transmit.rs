//! Host-to-device transmit path.
//!
//! 1. Hold the clock low for at least 100µs (request to send).
//! 2. Drive data low (start bit) and release the clock.
//! 3. On each clock low from the device, present the next data or parity bit;
//!    the device samples it when it releases the clock.
//! 4. After the parity bit, release data (stop bit) and wait for the device to
//!    ACK by pulling data low, pulse the clock once more, and release both.
//!
//! Each step is decided from the current line levels, so calling
//! [`Ps2Port::advance_write`] from the ISR and from `service` alike is safe.
//! The byte leaves the outbound queue only once the ACK handshake completes;
//! if the device misses any step the transfer is aborted and the byte is
//! dropped, leaving the retry decision to the caller.

use nio_lib::{Timebase, klog_trace, klog_warn};

use super::lines::{Level, Ps2Lines};
use super::port::{Ps2Port, Ps2State, TimeoutKind, WriteState};
use super::word::{FIRST_DATA_BIT, STOP_BIT, encode_byte};

/// Cursor value once data and parity are out and the stop bit is next.
const OUTGOING_DONE_MASK: u16 = 1 << STOP_BIT;

impl<L: Ps2Lines, T: Timebase> Ps2Port<L, T> {
    /// Start clocking out the head of the outbound queue, if any.
    pub(super) fn start_write_if_pending(&mut self) {
        // Peek only: the byte stays queued until the device ACKs it.
        let Some(&byte) = self.out_buffer.peek() else {
            return;
        };
        self.current_word = encode_byte(byte);
        // The start bit goes out by driving data low, not on a clock edge.
        self.bit_mask = 1 << FIRST_DATA_BIT;
        self.state = Ps2State::WritingWord;
        self.write_state = WriteState::HoldingClock;
        self.lines.hold_clock_low();
        self.arm(self.config.hold_clock_us, TimeoutKind::Internal);
        klog_trace!("PS/2: tx {:#04x} requested", byte);
    }

    /// Move the handshake forward as far as the line levels allow, and abort
    /// when the device has run out of time.
    pub(super) fn advance_write(&mut self) {
        match self.write_state {
            // Only the hold time can end this step.
            WriteState::HoldingClock => {}
            WriteState::WaitClockLow => {
                if self.lines.clock().is_low() {
                    if self.bit_mask == OUTGOING_DONE_MASK {
                        self.lines.release_data();
                        self.wait_for(WriteState::WaitDataLow);
                    } else {
                        let level = Level::from(self.current_word & self.bit_mask != 0);
                        self.lines.set_data(level);
                        self.bit_mask <<= 1;
                        self.wait_for(WriteState::WaitClockHigh);
                    }
                    return;
                }
            }
            WriteState::WaitClockHigh => {
                if self.lines.clock().is_high() {
                    self.wait_for(WriteState::WaitClockLow);
                    return;
                }
            }
            WriteState::WaitDataLow => {
                if self.lines.data().is_low() {
                    self.wait_for(WriteState::WaitFinalClockLow);
                    return;
                }
            }
            WriteState::WaitFinalClockLow => {
                if self.lines.clock().is_low() {
                    self.wait_for(WriteState::WaitForRelease);
                    return;
                }
            }
            WriteState::WaitForRelease => {
                if self.lines.clock().is_high() && self.lines.data().is_high() {
                    self.complete_write();
                    return;
                }
            }
        }
        match self.expired() {
            Some(TimeoutKind::Internal) => self.end_hold(),
            Some(TimeoutKind::External) => self.abort_write(),
            None => {}
        }
    }

    /// Hold time is over: present the start bit and hand the clock to the
    /// device.
    fn end_hold(&mut self) {
        self.lines.drive_data_low();
        self.lines.release_clock();
        self.wait_for(WriteState::WaitClockLow);
    }

    /// Drop the byte being clocked out, if a transfer is in progress.
    pub(super) fn discard_in_flight(&mut self) {
        if let Some(byte) = self.out_buffer.try_pop() {
            self.stats.transmit_aborts = self.stats.transmit_aborts.saturating_add(1);
            klog_warn!(
                "PS/2: tx {:#04x} aborted in {:?}, byte dropped",
                byte,
                self.write_state
            );
        }
    }

    /// Go to `next` and give the device a fresh window to get there.
    fn wait_for(&mut self, next: WriteState) {
        self.write_state = next;
        self.arm(self.config.device_response_us, TimeoutKind::External);
    }

    fn complete_write(&mut self) {
        if let Some(byte) = self.out_buffer.try_pop() {
            klog_trace!("PS/2: tx {:#04x} acked", byte);
            self.stats.bytes_sent = self.stats.bytes_sent.saturating_add(1);
        }
        self.release_lines();
        self.enter_idle();
    }

    fn abort_write(&mut self) {
        self.discard_in_flight();
        self.release_lines();
        self.enter_idle();
    }
}
