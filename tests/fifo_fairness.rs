//! Scenario 4: three threads created in order, each yielding `N` times.
//! FIFO round-robin guarantees the exact interleaving `A B C A B C ...`,
//! with no explicit join required for the scheduler to drain the queue.

use std::sync::Mutex;

const ROUNDS: usize = 4;

static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn a_thread(_: usize) {
    for _ in 0..ROUNDS {
        LOG.lock().unwrap().push("A");
        uthread::yield_now();
    }
}

fn b_thread(_: usize) {
    for _ in 0..ROUNDS {
        LOG.lock().unwrap().push("B");
        uthread::yield_now();
    }
}

fn c_thread(_: usize) {
    for _ in 0..ROUNDS {
        LOG.lock().unwrap().push("C");
        uthread::yield_now();
    }
}

fn main_thread(_: usize) {
    uthread::spawn("A", a_thread, 0);
    uthread::spawn("B", b_thread, 0);
    uthread::spawn("C", c_thread, 0);
    // main does not wait on any of them: the scheduler loop keeps draining
    // the queue after main exits, until A, B and C have all finished too.
}

#[test]
fn three_threads_interleave_in_creation_order() {
    uthread::init(main_thread, 0);
    let log = LOG.lock().unwrap();
    let expected: Vec<&'static str> = std::iter::repeat(["A", "B", "C"])
        .take(ROUNDS)
        .flatten()
        .collect();
    assert_eq!(*log, expected);
}
