//! Simulated PS/2 wire and device.
//!
//! Both lines are wired-AND: a line reads low if either end pulls it low. The
//! port under test drives the host half through [`Ps2Lines`]; [`SimDevice`]
//! drives the device half and plays the keyboard or mouse side of the
//! protocol. Time only moves when [`SimClock::advance`] is called.

use core::cell::Cell;

use nio_drivers::ps2::word::WORD_BITS;
use nio_drivers::ps2::{
    IntegrationMode, Level, Ps2Config, Ps2Lines, Ps2Port, Ps2Result, encode_byte, validate_word,
};
use nio_lib::Timebase;

/// Half a PS/2 clock period at ~12.5kHz.
pub const HALF_PERIOD_US: u16 = 40;

/// How long a device waits for the host to finish a request to send.
const RTS_WAIT_US: u16 = 2_000;
const RTS_POLL_US: u16 = 10;

#[derive(Default)]
pub struct SimClock {
    now: Cell<u16>,
}

impl SimClock {
    pub fn starting_at(micros: u16) -> Self {
        Self {
            now: Cell::new(micros),
        }
    }

    pub fn advance(&self, micros: u16) {
        self.now.set(self.now.get().wrapping_add(micros));
    }
}

impl Timebase for SimClock {
    fn micros(&self) -> u16 {
        self.now.get()
    }
}

#[derive(Default)]
pub struct SimWire {
    host_clock_low: Cell<bool>,
    host_data_low: Cell<bool>,
    device_clock_low: Cell<bool>,
    device_data_low: Cell<bool>,
}

impl SimWire {
    pub fn clock(&self) -> Level {
        Level::from(!(self.host_clock_low.get() || self.device_clock_low.get()))
    }

    pub fn data(&self) -> Level {
        Level::from(!(self.host_data_low.get() || self.device_data_low.get()))
    }

    /// Is the host holding the clock low?
    pub fn host_inhibits(&self) -> bool {
        self.host_clock_low.get()
    }

    pub fn host_drives_data(&self) -> bool {
        self.host_data_low.get()
    }
}

impl Ps2Lines for &SimWire {
    fn clock(&self) -> Level {
        SimWire::clock(self)
    }

    fn data(&self) -> Level {
        SimWire::data(self)
    }

    fn hold_clock_low(&mut self) {
        self.host_clock_low.set(true);
    }

    fn release_clock(&mut self) {
        self.host_clock_low.set(false);
    }

    fn drive_data_low(&mut self) {
        self.host_data_low.set(true);
    }

    fn release_data(&mut self) {
        self.host_data_low.set(false);
    }
}

pub type SimPort<'a> = Ps2Port<&'a SimWire, &'a SimClock>;

pub fn sim_port<'a>(
    wire: &'a SimWire,
    clock: &'a SimClock,
    mode: IntegrationMode,
) -> Ps2Result<SimPort<'a>> {
    Ps2Port::with_config(wire, clock, Ps2Config::new().with_mode(mode))
}

/// The device end of one wire.
///
/// Every change to the device's clock line is reported to the port the way
/// the board would: a pin-change interrupt in [`IntegrationMode::Interrupt`],
/// or the next main-loop poll in [`IntegrationMode::Polled`]. The main loop is
/// assumed to spin continuously, so `service` also runs after every step.
pub struct SimDevice<'a> {
    wire: &'a SimWire,
    clock: &'a SimClock,
    mode: IntegrationMode,
}

impl<'a> SimDevice<'a> {
    pub fn new(wire: &'a SimWire, clock: &'a SimClock, mode: IntegrationMode) -> Self {
        Self { wire, clock, mode }
    }

    /// Clock the low `bits` bits of `word` to the host, LSB first. Returns
    /// false without touching the wire if the host is inhibiting the bus.
    pub fn send_bits(&self, port: &mut SimPort<'a>, word: u16, bits: u16) -> bool {
        if self.wire.host_inhibits() {
            return false;
        }
        for bit in 0..bits {
            self.set_data_low(port, word & (1 << bit) == 0);
            self.set_clock_low(port, true);
            self.half_period(port);
            self.set_clock_low(port, false);
            self.half_period(port);
        }
        self.set_data_low(port, false);
        true
    }

    pub fn send_word(&self, port: &mut SimPort<'a>, word: u16) -> bool {
        self.send_bits(port, word, WORD_BITS)
    }

    pub fn send_byte(&self, port: &mut SimPort<'a>, byte: u8) -> bool {
        self.send_word(port, encode_byte(byte))
    }

    /// Wait for a request to send and clock in the eleven bits the host
    /// presents, without acknowledging them. None if the host never asks.
    pub fn clock_in_word(&self, port: &mut SimPort<'a>) -> Option<u16> {
        let mut waited = 0;
        while !(self.wire.clock().is_high() && self.wire.host_drives_data()) {
            if waited >= RTS_WAIT_US {
                return None;
            }
            port.service();
            self.clock.advance(RTS_POLL_US);
            waited += RTS_POLL_US;
        }

        // Bit 0 is the start bit the host is already driving.
        let mut word = 0u16;
        for bit in 1..WORD_BITS {
            self.set_clock_low(port, true);
            self.half_period(port);
            if self.wire.data().is_high() {
                word |= 1 << bit;
            }
            self.set_clock_low(port, false);
            self.half_period(port);
        }
        Some(word)
    }

    /// Pull data low and pulse the clock once to acknowledge a transfer.
    pub fn ack(&self, port: &mut SimPort<'a>) {
        self.set_data_low(port, true);
        self.set_clock_low(port, true);
        self.half_period(port);
        self.set_data_low(port, false);
        self.set_clock_low(port, false);
        self.half_period(port);
    }

    /// Take one command byte from the host the way a well-behaved device does.
    pub fn receive_byte(&self, port: &mut SimPort<'a>) -> Option<u8> {
        let word = self.clock_in_word(port)?;
        self.ack(port);
        validate_word(word).ok()
    }

    fn set_clock_low(&self, port: &mut SimPort<'a>, low: bool) {
        self.wire.device_clock_low.set(low);
        match self.mode {
            IntegrationMode::Interrupt => port.on_pin_change(),
            IntegrationMode::Polled => port.service(),
        }
    }

    fn set_data_low(&self, port: &mut SimPort<'a>, low: bool) {
        self.wire.device_data_low.set(low);
        port.service();
    }

    fn half_period(&self, port: &mut SimPort<'a>) {
        self.clock.advance(HALF_PERIOD_US);
        port.service();
    }
}
