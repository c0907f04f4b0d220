use nio_lib::MAX_DEADLINE_US;

use super::{Ps2Error, Ps2Result};

/// Minimum time the host must hold the clock low to request a send.
pub const MIN_HOLD_CLOCK_US: u16 = 100;

const DEFAULT_HOLD_CLOCK_US: u16 = 150;
const DEFAULT_DEVICE_RESPONSE_US: u16 = 1_500;
const DEFAULT_BIT_TIMEOUT_US: u16 = 250;
const DEFAULT_MODE: IntegrationMode = IntegrationMode::Interrupt;

/// How clock edges reach the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationMode {
    /// A pin-change ISR calls `on_edge` / `on_pin_change`; `service` only
    /// handles deadlines and transmit progress.
    Interrupt,
    /// `service` samples the clock itself and detects edges against the last
    /// seen level. Must be called far more often than the clock half-period.
    Polled,
}

impl IntegrationMode {
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("irq") || value.eq_ignore_ascii_case("interrupt") {
            Some(IntegrationMode::Interrupt)
        } else if value.eq_ignore_ascii_case("poll") || value.eq_ignore_ascii_case("polled") {
            Some(IntegrationMode::Polled)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationMode::Interrupt => "irq",
            IntegrationMode::Polled => "poll",
        }
    }
}

impl core::fmt::Display for IntegrationMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Timing and integration settings for one PS/2 port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ps2Config {
    /// How long the clock is held low before a host-to-device transfer.
    pub hold_clock_us: u16,
    /// How long the device gets to react at each transmit handshake step.
    pub device_response_us: u16,
    /// Longest gap between two received bits before the word is abandoned.
    pub bit_timeout_us: u16,
    pub mode: IntegrationMode,
}

impl Ps2Config {
    pub const fn new() -> Self {
        Self {
            hold_clock_us: DEFAULT_HOLD_CLOCK_US,
            device_response_us: DEFAULT_DEVICE_RESPONSE_US,
            bit_timeout_us: DEFAULT_BIT_TIMEOUT_US,
            mode: DEFAULT_MODE,
        }
    }

    pub const fn with_mode(mut self, mode: IntegrationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check every duration fits the wrapping deadline window.
    pub fn validate(&self) -> Ps2Result {
        if self.hold_clock_us < MIN_HOLD_CLOCK_US || self.hold_clock_us > MAX_DEADLINE_US {
            return Err(Ps2Error::TimeoutOutOfRange {
                micros: self.hold_clock_us,
            });
        }
        for micros in [self.device_response_us, self.bit_timeout_us] {
            if micros == 0 || micros > MAX_DEADLINE_US {
                return Err(Ps2Error::TimeoutOutOfRange { micros });
            }
        }
        Ok(())
    }
}

impl Default for Ps2Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_micros(value: &str) -> Option<u16> {
    value.trim_end_matches("us").parse::<u16>().ok()
}

/// Build a config from a board configuration string such as
/// `"ps2.mode=poll ps2.hold_us=120"`.
///
/// Unknown tokens and malformed values are ignored, leaving the default in
/// place. The result is not validated; pass it to `Ps2Port::with_config`.
pub fn ps2_config_from_str(config: Option<&str>) -> Ps2Config {
    let mut cfg = Ps2Config::default();
    if let Some(config) = config {
        for token in config.split_whitespace() {
            if let Some(value) = token.strip_prefix("ps2.hold_us=") {
                if let Some(micros) = parse_micros(value) {
                    cfg.hold_clock_us = micros;
                }
            } else if let Some(value) = token.strip_prefix("ps2.response_us=") {
                if let Some(micros) = parse_micros(value) {
                    cfg.device_response_us = micros;
                }
            } else if let Some(value) = token.strip_prefix("ps2.bit_timeout_us=") {
                if let Some(micros) = parse_micros(value) {
                    cfg.bit_timeout_us = micros;
                }
            } else if let Some(value) = token.strip_prefix("ps2.mode=") {
                if let Some(mode) = IntegrationMode::parse(value) {
                    cfg.mode = mode;
                }
            }
        }
    }
    cfg
}
