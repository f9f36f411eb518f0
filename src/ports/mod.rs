//! Architecture abstraction for the execution-context switcher.
//!
//! A [`Context`] is an opaque snapshot of the callee-saved registers and
//! stack pointer, sufficient to resume a thread exactly where it left off.
//! [`switch`] atomically saves the caller's state into one context and
//! resumes the state previously saved into another; [`make`] builds a fresh
//! context so that the *first* switch into it starts running a trampoline on
//! a caller-supplied stack.
//!
//! The two real backends below (x86-64 and AArch64) are selected at compile
//! time the same way every port in this crate's ancestry is: by
//! `target_arch`, with `cfg_if` picking the one that matches the host.
//! Unlike a microcontroller port, there is no vendor HAL here: the switch is
//! a handful of loads and stores to the stack, since the whole point of a
//! user-space thread library is to avoid a kernel round trip per switch.

use crate::error::{fatal, Error};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "x86_64")] {
        mod x86_64;
        use x86_64 as arch;
    } else if #[cfg(target_arch = "aarch64")] {
        mod aarch64;
        use aarch64 as arch;
    } else {
        compile_error!("uthread has no execution-context backend for this target_arch");
    }
}

pub(crate) use arch::Context;

/// Stack buffers must be aligned to this boundary before the first switch
/// into them; both supported ABIs require a 16-byte aligned stack pointer
/// at a `call` boundary.
pub(crate) const STACK_ALIGN: usize = 16;

/// Save the caller's registers into `old`, then resume from `new`.
///
/// # Safety
///
/// `old` must be a valid, exclusively-owned context slot; `new` must have
/// been produced by [`make`] or by a previous [`switch`] into it. The stack
/// `new` resumes onto must still be live.
#[inline]
pub(crate) unsafe fn switch(old: *mut Context, new: *const Context) {
    arch::switch(old, new)
}

/// Build a context that, when first switched into, begins executing
/// `trampoline` on `stack_top` (the high address of a stack allocation of at
/// least `STACK_SIZE` bytes, see [`crate::thread`]).
///
/// Reports `FATAL_CONTEXT` if the host reports the stack as unusable (too
/// small to hold the initial frame).
pub(crate) fn make(stack_top: *mut u8, trampoline: extern "C" fn() -> !) -> Context {
    match arch::make(stack_top, trampoline) {
        Some(ctx) => ctx,
        None => fatal(Error::Context, "ports::make"),
    }
}
