//! Scenario 1 from the scheduler's boundary-behavior table: two threads
//! yielding in lockstep, joined by `main` once both are done. Strict FIFO
//! round-robin means the interleaving is deterministic.

use std::sync::Mutex;

static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn p_thread(_: usize) {
    for _ in 0..3 {
        LOG.lock().unwrap().push("P");
        uthread::yield_now();
    }
}

fn q_thread(_: usize) {
    for _ in 0..3 {
        LOG.lock().unwrap().push("Q");
        uthread::yield_now();
    }
}

fn main_thread(_: usize) {
    let p = uthread::spawn("P", p_thread, 0);
    let q = uthread::spawn("Q", q_thread, 0);
    p.join();
    q.join();
}

#[test]
fn ping_pong_is_strict_fifo() {
    uthread::init(main_thread, 0);
    let log = LOG.lock().unwrap();
    assert_eq!(*log, vec!["P", "Q", "P", "Q", "P", "Q"]);
}
