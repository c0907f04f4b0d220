//! Keyboard + mouse port pair.
//!
//! The two connectors are electrically independent, but the command layer
//! assumes only one device is being talked to at a time. A directed write
//! therefore parks the other port (clock held low) until the target has
//! drained its outbound queue, then lets it run again.

use core::fmt;

use nio_lib::{RingBuffer, Timebase, klog_debug};

use super::lines::Ps2Lines;
use super::port::{Ps2Port, Ps2State};
use super::{IN_BUFFER_SIZE, Ps2Error, Ps2Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortId {
    Keyboard = 0,
    Mouse = 1,
}

impl PortId {
    pub const ALL: [PortId; 2] = [PortId::Keyboard, PortId::Mouse];

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            PortId::Keyboard => PortId::Mouse,
            PortId::Mouse => PortId::Keyboard,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortId::Keyboard => "keyboard",
            PortId::Mouse => "mouse",
        }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A byte received on one of the ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortEvent {
    pub port: PortId,
    pub byte: u8,
}

type Stash = RingBuffer<u8, IN_BUFFER_SIZE>;

pub struct PortPair<L, T> {
    ports: [Ps2Port<L, T>; 2],
    /// Bytes taken out of a port before parking it, since re-enabling a
    /// disabled port clears its queues.
    stash: [Stash; 2],
    /// Port parked for the duration of a directed write to the other one.
    parked: Option<PortId>,
    /// Ports disabled explicitly by the application.
    user_disabled: [bool; 2],
}

impl<L: Ps2Lines, T: Timebase> PortPair<L, T> {
    pub fn new(keyboard: Ps2Port<L, T>, mouse: Ps2Port<L, T>) -> Self {
        Self {
            ports: [keyboard, mouse],
            stash: [Stash::new_with(0), Stash::new_with(0)],
            parked: None,
            user_disabled: [false; 2],
        }
    }

    pub fn port(&self, id: PortId) -> &Ps2Port<L, T> {
        &self.ports[id.index()]
    }

    pub fn port_mut(&mut self, id: PortId) -> &mut Ps2Port<L, T> {
        &mut self.ports[id.index()]
    }

    /// Port currently parked for a directed write, if any.
    pub fn parked(&self) -> Option<PortId> {
        self.parked
    }

    /// Hold `id` disabled until [`PortPair::enable`].
    pub fn disable(&mut self, id: PortId) {
        self.user_disabled[id.index()] = true;
        match self.parked {
            Some(parked) if parked == id => {
                // Already disabled; just stop managing it.
                self.parked = None;
                return;
            }
            Some(parked) => {
                // `id` was the write target and its transfer is cancelled.
                self.parked = None;
                self.ports[parked.index()].enable();
            }
            None => {}
        }
        self.park(id);
    }

    pub fn enable(&mut self, id: PortId) {
        self.user_disabled[id.index()] = false;
        if self.parked == Some(id) {
            self.parked = None;
        }
        self.ports[id.index()].enable();
    }

    /// Queue `byte` for the device on `id`, parking the other port until the
    /// transfer is done.
    ///
    /// A port the application disabled is refused outright: it would never
    /// send, and enabling it clears its queue.
    pub fn write(&mut self, id: PortId, byte: u8) -> Ps2Result {
        if self.user_disabled[id.index()] {
            return Err(Ps2Error::PortDisabled { port: id });
        }
        if self.parked == Some(id) {
            return Err(Ps2Error::PortBusy { port: id });
        }
        if !self.ports[id.index()].enqueue_write(byte) {
            return Err(Ps2Error::QueueFull { port: id });
        }
        let other = id.other();
        if self.parked.is_none() && self.can_park(other) {
            self.park(other);
            self.parked = Some(other);
            klog_debug!("PS/2: {} parked for write to {}", other, id);
        }
        Ok(())
    }

    /// Oldest byte received on `id`.
    pub fn read(&mut self, id: PortId) -> Option<u8> {
        self.stash[id.index()]
            .try_pop()
            .or_else(|| self.ports[id.index()].read_byte())
    }

    /// Service both ports, release a parked port once its partner is done, and
    /// return the next received byte (keyboard first).
    pub fn poll(&mut self) -> Option<PortEvent> {
        for port in self.ports.iter_mut() {
            port.service();
        }

        if let Some(parked) = self.parked {
            let target = &self.ports[parked.other().index()];
            if target.pending_writes() == 0 && !target.is_active() {
                self.parked = None;
                self.ports[parked.index()].enable();
                klog_debug!("PS/2: {} released", parked);
            }
        }

        PortId::ALL
            .into_iter()
            .find_map(|port| self.read(port).map(|byte| PortEvent { port, byte }))
    }

    /// A port may be parked if the application has not disabled it and it is
    /// not itself sending.
    fn can_park(&self, id: PortId) -> bool {
        let port = &self.ports[id.index()];
        !self.user_disabled[id.index()]
            && port.state() != Ps2State::WritingWord
            && port.pending_writes() == 0
    }

    /// Disable `id`, first moving its received bytes somewhere safe.
    fn park(&mut self, id: PortId) {
        let index = id.index();
        while !self.stash[index].is_full() {
            let Some(byte) = self.ports[index].read_byte() else {
                break;
            };
            self.stash[index].try_push(byte);
        }
        self.ports[index].disable();
    }
}
