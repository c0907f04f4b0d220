//! Atari / Sega 9-pin joystick port.
//!
//! Reads single-button Atari and Master System pads as well as three-button
//! Mega Drive pads. A Mega Drive pad reports LEFT and RIGHT together while
//! SELECT is low, which no real stick can do; that combination tells us to
//! raise SELECT and read the second button bank. Six-button pads read as
//! three-button ones.

use bitflags::bitflags;

bitflags! {
    /// Buttons held down in one joystick sample.
    ///
    /// ```ignore
    /// if joystick.scan() {
    ///     let buttons = joystick.read();
    ///     if buttons.contains(JoystickButtons::FIRE) { /* ... */ }
    /// }
    /// ```
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct JoystickButtons: u16 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
        /// Also the single fire button on Atari-style sticks.
        const A     = 1 << 4;
        const B     = 1 << 5;
        const C     = 1 << 6;
        const START = 1 << 7;

        const FIRE  = Self::A.bits();
    }
}

/// Input pins of the joystick connector. All are active low with pull-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoystickPin {
    Up,
    Down,
    Left,
    Right,
    /// A with SELECT low, B with SELECT high.
    AB,
    /// START with SELECT low, C with SELECT high.
    StartC,
}

/// Board glue for one joystick connector.
pub trait JoystickPins {
    /// Is `pin` pulled low (button pressed)?
    fn is_low(&self, pin: JoystickPin) -> bool;
    /// Drive the SELECT output.
    fn set_select(&mut self, high: bool);
}

pub struct Joystick<P> {
    pins: P,
    current: JoystickButtons,
    last_read: JoystickButtons,
}

impl<P: JoystickPins> Joystick<P> {
    pub fn new(mut pins: P) -> Self {
        pins.set_select(false);
        Self {
            pins,
            current: JoystickButtons::empty(),
            last_read: JoystickButtons::empty(),
        }
    }

    /// Sample the pins. Returns true if the result differs from what
    /// [`Joystick::read`] last returned.
    pub fn scan(&mut self) -> bool {
        let mut buttons = JoystickButtons::empty();
        buttons.set(JoystickButtons::UP, self.pins.is_low(JoystickPin::Up));
        buttons.set(JoystickButtons::DOWN, self.pins.is_low(JoystickPin::Down));
        buttons.set(JoystickButtons::A, self.pins.is_low(JoystickPin::AB));
        buttons.set(JoystickButtons::START, self.pins.is_low(JoystickPin::StartC));
        buttons.set(JoystickButtons::LEFT, self.pins.is_low(JoystickPin::Left));
        buttons.set(JoystickButtons::RIGHT, self.pins.is_low(JoystickPin::Right));

        if buttons.contains(JoystickButtons::LEFT | JoystickButtons::RIGHT) {
            buttons.remove(JoystickButtons::LEFT | JoystickButtons::RIGHT);
            self.pins.set_select(true);
            buttons.set(JoystickButtons::LEFT, self.pins.is_low(JoystickPin::Left));
            buttons.set(JoystickButtons::RIGHT, self.pins.is_low(JoystickPin::Right));
            if self.pins.is_low(JoystickPin::AB) {
                buttons.insert(JoystickButtons::B);
            }
            if self.pins.is_low(JoystickPin::StartC) {
                buttons.insert(JoystickButtons::C);
            }
            self.pins.set_select(false);
        }

        self.current = buttons;
        self.has_new()
    }

    /// Latest sample; marks it as seen.
    pub fn read(&mut self) -> JoystickButtons {
        self.last_read = self.current;
        self.current
    }

    pub fn has_new(&self) -> bool {
        self.current != self.last_read
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }
}
