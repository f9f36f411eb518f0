//! Critical-Section Gate.
//!
//! Reading or writing scheduler state (the thread table, the run queue,
//! `current`) must happen with the preemption signal blocked, or a timer
//! tick landing mid-mutation hands the scheduler a torn `HashMap`. The
//! whole runtime lives on a single OS thread, so the POSIX signal mask
//! itself is the lock; there is never a second thread to contend with it.
//!
//! Not a counted lock. A held block carries across a context switch for
//! free: the mask belongs to the OS thread, not to any one green thread's
//! saved registers, so whichever context resumes next simply inherits
//! whatever bit was set when it last ran. Every op that switches away
//! (`yield_now`, `wait`, `exit`) blocks at entry and leaves the mask
//! blocked across its own switch. Unblocking happens only on the far side,
//! by whichever code is about to hand control to a thread's own user code:
//! the tail of a resumed `yield_now`/`wait`, or the trampoline's first
//! entry into a brand new thread. That unblock always runs locally, on
//! whichever stack is about to run user code, regardless of how many other
//! threads are parked mid-switch with their own block still held above
//! them: unblocking means "turn the signal on now", not "decrement a
//! shared counter".
//!
//! Operations that never switch away (`spawn`, one iteration of the
//! scheduler loop's own bookkeeping) use the small RAII [`Gate`] below
//! instead: plain block, mutate, unblock.

use crate::error::{fatal, Error};

fn preempt_sigset() -> libc::sigset_t {
    unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        libc::sigaddset(&mut set, crate::timer::PREEMPT_SIGNAL);
        set
    }
}

/// Block the preemption signal. Idempotent: calling it while already blocked
/// (the kernel's own implicit block on signal delivery, or a previous call
/// on this path) is a harmless no-op syscall.
pub(crate) fn block() {
    let set = preempt_sigset();
    let rc = unsafe { libc::sigprocmask(libc::SIG_BLOCK, &set, std::ptr::null_mut()) };
    if rc != 0 {
        fatal(Error::Timer, "gate::block");
    }
}

/// Unblock the preemption signal. Call only from code that is about to hand
/// control to a thread's own user code.
pub(crate) fn unblock() {
    let set = preempt_sigset();
    let rc = unsafe { libc::sigprocmask(libc::SIG_UNBLOCK, &set, std::ptr::null_mut()) };
    if rc != 0 {
        fatal(Error::Timer, "gate::unblock");
    }
}

/// RAII handle for a critical section that does not switch contexts before
/// releasing it: `spawn`'s table/queue mutation, or one iteration of the
/// scheduler loop's bookkeeping between two switches.
#[must_use = "the gate is released when this guard drops"]
pub(crate) struct Gate {
    _private: (),
}

impl Gate {
    pub(crate) fn acquire() -> Gate {
        block();
        Gate { _private: () }
    }
}

impl Drop for Gate {
    fn drop(&mut self) {
        unblock();
    }
}
