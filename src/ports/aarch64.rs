//! AArch64 execution-context backend (AAPCS64).
//!
//! The callee-saved set is `x19`–`x28`, the frame pointer `x29`, the link
//! register `x30`, and `sp`. Unlike the x86-64 backend there is no implicit
//! return-address-on-the-stack trick available: AArch64's `ret` branches to
//! whatever is in `x30`, so [`switch`] restores `x30` explicitly from the
//! saved [`Context`] before branching, and [`make`] seeds it with the
//! trampoline address directly rather than writing to the stack at all.

use std::arch::asm;

#[repr(C)]
#[derive(Default, Debug)]
pub(crate) struct Context {
    sp: u64,
    fp: u64,
    lr: u64,
    x19: u64,
    x20: u64,
    x21: u64,
    x22: u64,
    x23: u64,
    x24: u64,
    x25: u64,
    x26: u64,
    x27: u64,
    x28: u64,
}

/// Save the current callee-saved registers into `*old`, then load and resume
/// `*new`, branching to its saved link register.
///
/// # Safety
/// See [`super::switch`].
pub(crate) unsafe fn switch(old: *mut Context, new: *const Context) {
    asm!(
        "mov x2, sp",
        "str x2,  [x0, #0]",
        "str x29, [x0, #8]",
        "str x30, [x0, #16]",
        "stp x19, x20, [x0, #24]",
        "stp x21, x22, [x0, #40]",
        "stp x23, x24, [x0, #56]",
        "stp x25, x26, [x0, #72]",
        "stp x27, x28, [x0, #88]",
        "ldr x2,  [x1, #0]",
        "mov sp, x2",
        "ldr x29, [x1, #8]",
        "ldr x30, [x1, #16]",
        "ldp x19, x20, [x1, #24]",
        "ldp x21, x22, [x1, #40]",
        "ldp x23, x24, [x1, #56]",
        "ldp x25, x26, [x1, #72]",
        "ldp x27, x28, [x1, #88]",
        "ret",
        in("x0") old,
        in("x1") new,
        out("x2") _,
        options(noreturn),
    );
}

/// Build a context that branches straight into `trampoline` on its first
/// resume; no initial stack contents are required since the link register
/// carries the resume address directly.
pub(crate) fn make(stack_top: *mut u8, trampoline: extern "C" fn() -> !) -> Option<Context> {
    if stack_top.is_null() {
        return None;
    }
    let sp = (stack_top as usize) & !0xF;
    if sp == 0 {
        return None;
    }
    Some(Context {
        sp: sp as u64,
        lr: trampoline as usize as u64,
        ..Default::default()
    })
}
