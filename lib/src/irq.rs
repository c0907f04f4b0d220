//! Interrupt masking backend: irqsave / irqrestore.
//!
//! The library does not know which MCU it runs on, so the board binding
//! registers a pair of functions once at startup. Until then (and always in
//! hosted tests) masking is a no-op, which is correct for code that has no
//! interrupt handlers attached.
//!
//! ```ignore
//! nio_lib::irq::irq_register_backend(IrqBackend {
//!     save_and_disable: board::sreg_save_cli,
//!     restore: board::sreg_restore,
//! });
//! ```

use spin::Once;

/// Saved interrupt-enable state returned by [`save_and_disable`].
///
/// Opaque to the library; the backend decides what the bits mean (e.g. the
/// AVR `SREG` or the Cortex-M `PRIMASK`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "the saved state must be handed back to `restore`"]
pub struct IrqState(pub usize);

/// Board-supplied interrupt control.
#[derive(Clone, Copy)]
pub struct IrqBackend {
    /// Save the current interrupt-enable state, then mask interrupts.
    pub save_and_disable: fn() -> usize,
    /// Restore the state captured by `save_and_disable`. Must only re-enable
    /// interrupts if they were enabled in the saved state.
    pub restore: fn(usize),
}

static BACKEND: Once<IrqBackend> = Once::new();

/// Register the interrupt backend.
///
/// Only the first registration takes effect; returns `false` if a backend was
/// already installed.
pub fn irq_register_backend(backend: IrqBackend) -> bool {
    let mut installed = false;
    BACKEND.call_once(|| {
        installed = true;
        backend
    });
    installed
}

/// Returns true once a backend has been registered.
pub fn irq_backend_registered() -> bool {
    BACKEND.is_completed()
}

/// Save the interrupt state and mask interrupts (irqsave pattern).
#[inline(always)]
pub fn save_and_disable() -> IrqState {
    match BACKEND.get() {
        Some(backend) => IrqState((backend.save_and_disable)()),
        None => IrqState(0),
    }
}

/// Restore the interrupt state saved by [`save_and_disable`] (irqrestore).
#[inline(always)]
pub fn restore(state: IrqState) {
    if let Some(backend) = BACKEND.get() {
        (backend.restore)(state.0);
    }
}

/// Run `f` with interrupts masked.
#[inline]
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    let saved = save_and_disable();
    let result = f();
    restore(saved);
    result
}
