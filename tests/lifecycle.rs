//! Two boundary-behavior scenarios that share a single test binary — and
//! therefore a single process with one preemption timer armed at a time —
//! so they run under `#[sequential]` and tear the singleton scheduler down
//! with `reset_scheduler_for_tests` between cases, rather than relying on
//! the default per-test-thread harness to keep two live schedulers apart.

use sequential_test::sequential;
use std::sync::atomic::{AtomicBool, Ordering};

static T_RAN: AtomicBool = AtomicBool::new(false);

fn t_thread(_: usize) {
    T_RAN.store(true, Ordering::SeqCst);
}

fn join_on_finished_main(_: usize) {
    let t = uthread::spawn("T", t_thread, 0);
    // Let T run to completion and be reaped before main ever calls join, so
    // join() exercises the "target already terminated" no-op path instead
    // of actually blocking.
    uthread::yield_now();
    t.join();
}

#[test]
#[sequential]
fn join_on_already_terminated_target_is_a_no_op() {
    uthread::init(join_on_finished_main, 0);
    assert!(T_RAN.load(Ordering::SeqCst));
    uthread::reset_scheduler_for_tests();
}

fn solo_main(_: usize) {
    // Neither spawns nor yields: the scheduler resumes it exactly once and
    // the run queue is empty the moment it returns.
}

#[test]
#[sequential]
fn single_thread_program_runs_to_completion() {
    uthread::init(solo_main, 0);
    uthread::reset_scheduler_for_tests();
}
