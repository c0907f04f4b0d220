#![no_std]

pub mod joystick;
pub mod ps2;

pub use ps2::{PortPair, Ps2Port};
