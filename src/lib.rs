//! Cooperative-plus-preemptive user-space threads on a single OS thread.
//!
//! Threads are created with [`spawn`], run round-robin to completion or an
//! explicit [`exit`], and may be waited on through the [`JoinHandle`]
//! `spawn` returns. A process-CPU-time interval timer delivers a signal
//! every [`QUANTUM`] so a thread that never calls [`yield_now`] is preempted
//! anyway; a thread that wants to give up its turn early can call it
//! directly. [`init`] bootstraps the scheduler and runs it to completion;
//! call it once, from the host's own `main`.
//!
//! ```no_run
//! fn worker(n: usize) {
//!     for _ in 0..3 {
//!         println!("worker {n}");
//!         uthread::yield_now();
//!     }
//! }
//!
//! fn main_thread(_: usize) {
//!     let handles: Vec<_> = (0..4).map(|n| uthread::spawn("worker", worker, n)).collect();
//!     for h in handles {
//!         h.join();
//!     }
//! }
//!
//! fn main() {
//!     uthread::init(main_thread, 0);
//! }
//! ```

mod error;
mod gate;
mod list;
mod ports;
mod scheduler;
mod thread;
mod timer;

pub use error::Error;
pub use scheduler::{current, exit, init, spawn, yield_now, JoinHandle, Thread};
pub use thread::{EntryFn, STACK_SIZE};
pub use timer::QUANTUM;

#[cfg(feature = "test-support")]
pub use scheduler::reset_scheduler_for_tests;
