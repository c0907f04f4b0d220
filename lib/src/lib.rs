#![no_std]

pub mod clock;
pub mod irq;
pub mod klog;
pub mod ring_buffer;
pub mod spinlock;

pub use clock::{Deadline, MAX_DEADLINE_US, Timebase};
pub use irq::{IrqBackend, IrqState, irq_register_backend, without_interrupts};
pub use klog::{KlogLevel, klog_get_level, klog_register_backend, klog_set_level};
pub use ring_buffer::RingBuffer;
pub use spinlock::{IrqMutex, IrqMutexGuard};
