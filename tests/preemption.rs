//! Scenario 3: a thread that spins for several quanta without ever calling
//! `yield_now` must still be preempted, letting a second thread run and
//! finish in between.

use std::sync::Mutex;
use std::time::Instant;

static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn busy_thread(_: usize) {
    let start = Instant::now();
    while start.elapsed() < uthread::QUANTUM * 3 {
        std::hint::spin_loop();
    }
    LOG.lock().unwrap().push("loop-done");
}

fn printer_thread(_: usize) {
    LOG.lock().unwrap().push("X");
}

fn main_thread(_: usize) {
    let busy = uthread::spawn("busy", busy_thread, 0);
    let printer = uthread::spawn("printer", printer_thread, 0);
    busy.join();
    printer.join();
}

#[test]
fn preemption_lets_a_second_thread_run_first() {
    uthread::init(main_thread, 0);
    let log = LOG.lock().unwrap();
    assert_eq!(log.first().copied(), Some("X"));
    assert!(log.contains(&"loop-done"));
}
