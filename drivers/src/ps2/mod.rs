//! PS/2 protocol engine.
//!
//! Bit-bangs the PS/2 wire protocol on two GPIO lines per connector. The MCU
//! is always the host: it reads words clocked in by the device and sends
//! command bytes using the request-to-send handshake.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐ edges  ┌──────────────────────────┐  bytes  ┌─────────────┐
//! │  Pin-change │───────▶│         Ps2Port          │────────▶│ Application │
//! │  ISR / poll │        │ receive ─┐    ┌─ transmit│◀────────│  main loop  │
//! └─────────────┘        │          ▼    ▼          │         └─────────────┘
//!                        │   in_buffer  out_buffer  │
//!                        └────────────┬─────────────┘
//!                                     ▼
//!                           Ps2Lines (CLK, DATA)
//! ```
//!
//! # Word format (11 bits, LSB first)
//!
//! | Bit  | Meaning |
//! |------|---------|
//! | 0    | Start, always 0 |
//! | 1-8  | Data, LSB first |
//! | 9    | Odd parity over the data bits |
//! | 10   | Stop, always 1 |
//!
//! Both lines are open-collector with pull-ups: "releasing" a line lets it
//! float high, and either side may pull it low.

pub mod config;
mod error;
pub mod lines;
pub mod pair;
pub mod port;
mod receive;
pub mod stats;
mod transmit;
pub mod word;

pub use config::{IntegrationMode, Ps2Config, ps2_config_from_str};
pub use error::{Ps2Error, Ps2Result, WordError};
pub use lines::{Edge, Level, Ps2Lines};
pub use pair::{PortEvent, PortId, PortPair};
pub use port::{Ps2Port, Ps2State, WriteState};
pub use stats::Ps2Stats;
pub use word::{encode_byte, validate_word};

// =============================================================================
// Queue sizes
// =============================================================================

/// Received bytes buffered per port before the bus is inhibited.
pub const IN_BUFFER_SIZE: usize = 32;

/// Command bytes queued per port for the device.
pub const OUT_BUFFER_SIZE: usize = 32;
