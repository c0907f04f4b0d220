use nio_drivers::ps2::{IntegrationMode, PortEvent, PortId, PortPair, Ps2Error, Ps2State};

use crate::sim::{SimClock, SimDevice, SimWire, sim_port};

#[test]
fn keyboard_command_parks_mouse_until_acked() {
    let mode = IntegrationMode::Interrupt;
    let (kbd_wire, kbd_clock) = (SimWire::default(), SimClock::default());
    let (mouse_wire, mouse_clock) = (SimWire::default(), SimClock::default());
    let kbd = SimDevice::new(&kbd_wire, &kbd_clock, mode);
    let mouse = SimDevice::new(&mouse_wire, &mouse_clock, mode);
    let mut pair = PortPair::new(
        sim_port(&kbd_wire, &kbd_clock, mode).unwrap(),
        sim_port(&mouse_wire, &mouse_clock, mode).unwrap(),
    );

    pair.write(PortId::Keyboard, 0xF4).unwrap();
    assert_eq!(pair.parked(), Some(PortId::Mouse));
    assert!(mouse_wire.host_inhibits());
    assert!(!mouse.send_byte(pair.port_mut(PortId::Mouse), 0x08));

    assert_eq!(kbd.receive_byte(pair.port_mut(PortId::Keyboard)), Some(0xF4));
    assert_eq!(pair.poll(), None);
    assert_eq!(pair.parked(), None);
    assert!(!mouse_wire.host_inhibits());

    assert!(mouse.send_byte(pair.port_mut(PortId::Mouse), 0x08));
    assert!(kbd.send_byte(pair.port_mut(PortId::Keyboard), 0xFA));
    assert_eq!(
        pair.poll(),
        Some(PortEvent {
            port: PortId::Keyboard,
            byte: 0xFA
        })
    );
    assert_eq!(
        pair.poll(),
        Some(PortEvent {
            port: PortId::Mouse,
            byte: 0x08
        })
    );
    assert_eq!(pair.poll(), None);
}

#[test]
fn bytes_received_before_parking_survive() {
    let mode = IntegrationMode::Polled;
    let (kbd_wire, kbd_clock) = (SimWire::default(), SimClock::default());
    let (mouse_wire, mouse_clock) = (SimWire::default(), SimClock::default());
    let mouse = SimDevice::new(&mouse_wire, &mouse_clock, mode);
    let mut pair = PortPair::new(
        sim_port(&kbd_wire, &kbd_clock, mode).unwrap(),
        sim_port(&mouse_wire, &mouse_clock, mode).unwrap(),
    );

    for byte in [0x08, 0x01, 0xFF] {
        assert!(mouse.send_byte(pair.port_mut(PortId::Mouse), byte));
    }
    pair.write(PortId::Keyboard, 0xED).unwrap();
    assert_eq!(pair.port(PortId::Mouse).state(), Ps2State::Disabled);

    assert_eq!(pair.read(PortId::Mouse), Some(0x08));
    assert_eq!(pair.read(PortId::Mouse), Some(0x01));
    assert_eq!(pair.read(PortId::Mouse), Some(0xFF));
    assert_eq!(pair.read(PortId::Mouse), None);
}

#[test]
fn silent_keyboard_still_releases_mouse() {
    let mode = IntegrationMode::Interrupt;
    let (kbd_wire, kbd_clock) = (SimWire::default(), SimClock::default());
    let (mouse_wire, mouse_clock) = (SimWire::default(), SimClock::default());
    let mut pair = PortPair::new(
        sim_port(&kbd_wire, &kbd_clock, mode).unwrap(),
        sim_port(&mouse_wire, &mouse_clock, mode).unwrap(),
    );

    pair.write(PortId::Keyboard, 0xFF).unwrap();
    assert_eq!(
        pair.write(PortId::Mouse, 0xFF),
        Err(Ps2Error::PortBusy {
            port: PortId::Mouse
        })
    );

    for _ in 0..50 {
        pair.poll();
        kbd_clock.advance(100);
    }
    assert_eq!(pair.port(PortId::Keyboard).stats().transmit_aborts, 1);
    assert_eq!(pair.parked(), None);
    assert_eq!(pair.port(PortId::Mouse).state(), Ps2State::Idle);
    assert_eq!(pair.write(PortId::Mouse, 0xFF), Ok(()));
}

#[test]
fn command_to_disabled_keyboard_is_refused() {
    let mode = IntegrationMode::Interrupt;
    let (kbd_wire, kbd_clock) = (SimWire::default(), SimClock::default());
    let (mouse_wire, mouse_clock) = (SimWire::default(), SimClock::default());
    let mouse = SimDevice::new(&mouse_wire, &mouse_clock, mode);
    let mut pair = PortPair::new(
        sim_port(&kbd_wire, &kbd_clock, mode).unwrap(),
        sim_port(&mouse_wire, &mouse_clock, mode).unwrap(),
    );

    pair.disable(PortId::Keyboard);
    assert_eq!(
        pair.write(PortId::Keyboard, 0xED),
        Err(Ps2Error::PortDisabled {
            port: PortId::Keyboard
        })
    );
    // The mouse keeps talking to the host.
    assert!(mouse.send_byte(pair.port_mut(PortId::Mouse), 0x08));
    assert_eq!(
        pair.poll(),
        Some(PortEvent {
            port: PortId::Mouse,
            byte: 0x08
        })
    );
}

#[test]
fn enabling_keyboard_mid_command_drops_it() {
    let mode = IntegrationMode::Polled;
    let (kbd_wire, kbd_clock) = (SimWire::default(), SimClock::default());
    let (mouse_wire, mouse_clock) = (SimWire::default(), SimClock::default());
    let kbd = SimDevice::new(&kbd_wire, &kbd_clock, mode);
    let mut pair = PortPair::new(
        sim_port(&kbd_wire, &kbd_clock, mode).unwrap(),
        sim_port(&mouse_wire, &mouse_clock, mode).unwrap(),
    );

    pair.write(PortId::Keyboard, 0xFF).unwrap();
    pair.poll();
    pair.enable(PortId::Keyboard);
    assert_eq!(pair.port(PortId::Keyboard).stats().transmit_aborts, 1);
    // Nothing left to send: the device never sees a request to send.
    assert_eq!(kbd.receive_byte(pair.port_mut(PortId::Keyboard)), None);
    pair.poll();
    assert_eq!(pair.parked(), None);
}
