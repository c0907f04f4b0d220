//! Host-side scenario tests for the I/O controller firmware.
//!
//! [`sim`] models the open-collector PS/2 wire and a device at the far end of
//! it, so whole transfers can be played against a real [`Ps2Port`] without
//! hardware. The suites below drive the engine the way the board does: from a
//! pin-change interrupt, or by polling in the main loop.
//!
//! [`Ps2Port`]: nio_drivers::ps2::Ps2Port

#![cfg_attr(not(test), no_std)]

pub mod sim;

#[cfg(test)]
mod pair_tests;
