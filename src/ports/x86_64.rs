//! x86-64 execution-context backend (SysV AMD64 ABI).
//!
//! The callee-saved register set under this ABI is `rbx`, `rbp`, `r12`–`r15`,
//! plus the stack pointer itself; everything else is caller-saved and needs
//! no place in [`Context`]. There is no saved instruction pointer field: the
//! very first word on a freshly-built stack *is* the resume address, and
//! [`switch`] resumes by loading the saved `rsp` and executing a plain `ret`,
//! exactly as if the thread were returning from the call that suspended it.

use std::arch::asm;

#[repr(C)]
#[derive(Default, Debug)]
pub(crate) struct Context {
    rsp: u64,
    rbx: u64,
    rbp: u64,
    r12: u64,
    r13: u64,
    r14: u64,
    r15: u64,
}

/// Save the current callee-saved registers into `*old`, then load and resume
/// `*new` with a `ret` into whatever address sits at the top of its stack.
///
/// # Safety
/// See [`super::switch`].
pub(crate) unsafe fn switch(old: *mut Context, new: *const Context) {
    asm!(
        "mov [rdi + 0x00], rsp",
        "mov [rdi + 0x08], rbx",
        "mov [rdi + 0x10], rbp",
        "mov [rdi + 0x18], r12",
        "mov [rdi + 0x20], r13",
        "mov [rdi + 0x28], r14",
        "mov [rdi + 0x30], r15",
        "mov rsp, [rsi + 0x00]",
        "mov rbx, [rsi + 0x08]",
        "mov rbp, [rsi + 0x10]",
        "mov r12, [rsi + 0x18]",
        "mov r13, [rsi + 0x20]",
        "mov r14, [rsi + 0x28]",
        "mov r15, [rsi + 0x30]",
        "ret",
        in("rdi") old,
        in("rsi") new,
        options(noreturn),
    );
}

/// Build a context whose first `ret` (performed by [`switch`]) branches into
/// `trampoline` with a correctly 16-byte-pre-call-aligned stack.
pub(crate) fn make(stack_top: *mut u8, trampoline: extern "C" fn() -> !) -> Option<Context> {
    if stack_top.is_null() {
        return None;
    }
    // Round down to 16 bytes, then reserve one aligned slot below that for
    // the initial return address, leaving headroom so the slot itself sits
    // at a 16-byte boundary (required so the simulated `call` leaves the
    // entered function with rsp % 16 == 8, per the SysV AMD64 ABI).
    let top = (stack_top as usize) & !0xF;
    if top < super::STACK_ALIGN {
        return None;
    }
    let slot = top - super::STACK_ALIGN;
    unsafe {
        (slot as *mut u64).write(trampoline as usize as u64);
    }
    Some(Context {
        rsp: slot as u64,
        ..Default::default()
    })
}
