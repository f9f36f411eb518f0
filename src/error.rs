//! Fatal error taxonomy.
//!
//! Every failure the scheduler can hit is unrecoverable: once the run queue,
//! the `current` pointer, or a signal mask has been left in an inconsistent
//! state there is no safe way to keep scheduling threads. Each variant names
//! the condition and the call site; [`fatal`] logs it and aborts the process.
//! The one user-visible exception is `wait`/`join` on an already-terminated
//! target, which is a silent no-op and never constructs an [`Error`].

use std::fmt;

/// A condition that leaves scheduler invariants unrecoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// [`crate::init`] was called more than once in this process.
    Reinit,
    /// The architecture context primitive reported failure while building a
    /// fresh context or switching between two.
    Context,
    /// Arming or disarming the preemption timer failed.
    Timer,
    /// Allocating a thread record or its stack failed.
    Alloc,
    /// The run queue is non-empty but every thread in it is `WAITING`.
    Deadlock,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Reinit => write!(f, "FATAL_REINIT: init() called more than once"),
            Error::Context => write!(f, "FATAL_CONTEXT: context primitive reported failure"),
            Error::Timer => write!(f, "FATAL_TIMER: preemption timer could not be armed"),
            Error::Alloc => write!(f, "FATAL_ALLOC: thread record or stack allocation failed"),
            Error::Deadlock => write!(
                f,
                "FATAL_DEADLOCK: every thread in the run queue is waiting"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Log `err` at the call site and terminate the process.
///
/// There is no recovery path: every caller of this function has already left
/// scheduler state in a shape that cannot be scheduled from safely.
#[cold]
pub(crate) fn fatal(err: Error, call_site: &str) -> ! {
    log::error!("{err} (at {call_site})");
    std::process::exit(1);
}
