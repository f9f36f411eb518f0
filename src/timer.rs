//! Preemption timer.
//!
//! An interval timer measured against the process's own CPU time (not wall
//! clock, so a process that is descheduled by the kernel for a while does
//! not get a burst of back-to-back preemptions the moment it resumes),
//! delivering [`PREEMPT_SIGNAL`] once per [`QUANTUM`]. The signal handler is
//! the only asynchronous entry point into this crate; it does nothing but
//! forward to [`crate::scheduler::preempt`], which runs the same logic as a
//! voluntary `yield_now`.
//!
//! `SIGPROF` is chosen deliberately: it is backed by `ITIMER_PROF`, which
//! counts both user- and system-mode CPU time (matching "process CPU time"),
//! and is far less likely than `SIGALRM` to collide with a signal the host
//! application already has its own handler installed for.

use std::mem::MaybeUninit;
use std::time::Duration;

use crate::error::{fatal, Error};

pub(crate) const PREEMPT_SIGNAL: libc::c_int = libc::SIGPROF;

/// Preemption period. 10ms is a common default quantum for cooperative
/// schedulers with timer-driven preemption: short enough that a runaway
/// thread cannot starve its siblings for long, long enough that the
/// signal-handling overhead stays negligible next to actual thread work.
pub const QUANTUM: Duration = Duration::from_millis(10);

extern "C" fn handle_preempt(_signum: libc::c_int) {
    crate::scheduler::preempt();
}

/// Install the signal handler and arm the repeating interval timer.
///
/// # Safety
/// Must be called exactly once, from [`crate::init`], before any thread has
/// been switched into.
pub(crate) unsafe fn arm() {
    let mut action: libc::sigaction = std::mem::zeroed();
    action.sa_sigaction = handle_preempt as usize;
    libc::sigemptyset(&mut action.sa_mask);
    action.sa_flags = 0;

    if libc::sigaction(PREEMPT_SIGNAL, &action, std::ptr::null_mut()) != 0 {
        fatal(Error::Timer, "timer::arm (sigaction)");
    }

    let interval = duration_to_timeval(QUANTUM);
    let spec = libc::itimerval {
        it_interval: interval,
        it_value: interval,
    };
    if libc::setitimer(libc::ITIMER_PROF, &spec, std::ptr::null_mut()) != 0 {
        fatal(Error::Timer, "timer::arm (setitimer)");
    }
    log::debug!("timer: armed, quantum {QUANTUM:?}");
}

/// Disarm the timer and restore the default signal disposition. Called once
/// the run queue has drained and the scheduler loop is about to return.
pub(crate) fn disarm() {
    unsafe {
        let zero = libc::itimerval {
            it_interval: std::mem::zeroed(),
            it_value: std::mem::zeroed(),
        };
        libc::setitimer(libc::ITIMER_PROF, &zero, std::ptr::null_mut());

        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = libc::SIG_DFL;
        libc::sigaction(PREEMPT_SIGNAL, &action, std::ptr::null_mut());
    }
    log::debug!("timer: disarmed");
}

fn duration_to_timeval(d: Duration) -> libc::timeval {
    let mut tv = unsafe { MaybeUninit::<libc::timeval>::zeroed().assume_init() };
    tv.tv_sec = d.as_secs() as libc::time_t;
    tv.tv_usec = d.subsec_micros() as libc::suseconds_t;
    tv
}
