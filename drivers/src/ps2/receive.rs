//! Device-to-host receive path.
//!
//! The device drives the clock at 10-16.7kHz and data is valid on each falling
//! edge. The first falling edge carries the start bit; after the 11th the word
//! is checked and either queued or dropped. Every edge re-arms the bit
//! timeout, so a device that stops mid-word (unplugged, glitch) costs one
//! abandoned word and nothing more.

use nio_lib::{Timebase, klog_debug, klog_trace};

use super::lines::{Level, Ps2Lines};
use super::port::{Ps2Port, Ps2State, TimeoutKind};
use super::word::{WORD_BITS, validate_word};

/// Cursor value once all eleven bits have been collected.
const INCOMING_DONE_MASK: u16 = 1 << WORD_BITS;

impl<L: Ps2Lines, T: Timebase> Ps2Port<L, T> {
    /// First falling edge out of Idle: the start bit.
    pub(super) fn begin_word(&mut self, data: Level) {
        self.reset_word();
        self.state = Ps2State::ReadingWord;
        self.read_bit(data);
    }

    /// Shift one sampled bit into the word at the cursor.
    pub(super) fn read_bit(&mut self, data: Level) {
        if data.is_high() {
            self.current_word |= self.bit_mask;
        }
        self.bit_mask <<= 1;
        if self.bit_mask == INCOMING_DONE_MASK {
            self.finish_word();
        } else {
            self.arm(self.config.bit_timeout_us, TimeoutKind::External);
        }
    }

    /// Abandon a partial word if the device went quiet.
    pub(super) fn check_receive_timeout(&mut self) {
        if self.expired().is_none() {
            return;
        }
        klog_debug!(
            "PS/2: receive timeout, dropping partial word {:#05x} (mask {:#05x})",
            self.current_word,
            self.bit_mask
        );
        self.stats.receive_timeouts = self.stats.receive_timeouts.saturating_add(1);
        self.enter_idle();
    }

    fn finish_word(&mut self) {
        let word = self.current_word;
        match validate_word(word) {
            Ok(byte) => {
                klog_trace!("PS/2: rx {:#04x}", byte);
                if self.in_buffer.try_push(byte) {
                    self.stats.bytes_received = self.stats.bytes_received.saturating_add(1);
                } else {
                    self.stats.overruns = self.stats.overruns.saturating_add(1);
                }
                if self.in_buffer.is_full() {
                    self.inhibit();
                    return;
                }
            }
            Err(err) => {
                klog_debug!("PS/2: dropping word {:#05x}: {}", word, err);
                self.stats.framing_errors = self.stats.framing_errors.saturating_add(1);
            }
        }
        self.enter_idle();
    }

    /// Inbound queue full: hold the clock so the device buffers on its side.
    fn inhibit(&mut self) {
        self.lines.hold_clock_low();
        self.reset_word();
        self.timeout = None;
        self.state = Ps2State::BufferFull;
        self.stats.inhibits = self.stats.inhibits.saturating_add(1);
        klog_debug!("PS/2: inbound queue full, inhibiting bus");
    }
}
