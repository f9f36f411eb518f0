//! Fixture binary for the deadlock integration test (`tests/deadlock.rs`).
//!
//! X waits on Y and Y waits on X, so the run queue is non-empty but every
//! thread in it is WAITING; the scheduler loop has no candidate to resume
//! and aborts with `FATAL_DEADLOCK`. This has to live in its own process,
//! since it is expected to call `process::exit(1)`, which a `#[test]` can't
//! assert on directly.

use std::sync::Mutex;

static HANDLES: Mutex<(Option<uthread::JoinHandle>, Option<uthread::JoinHandle>)> =
    Mutex::new((None, None));

fn x_thread(_: usize) {
    let y = HANDLES
        .lock()
        .unwrap()
        .1
        .take()
        .expect("y's handle is published before x or y ever run");
    y.join();
}

fn y_thread(_: usize) {
    let x = HANDLES
        .lock()
        .unwrap()
        .0
        .take()
        .expect("x's handle is published before x or y ever run");
    x.join();
}

fn main_thread(_: usize) {
    let x = uthread::spawn("X", x_thread, 0);
    let y = uthread::spawn("Y", y_thread, 0);
    *HANDLES.lock().unwrap() = (Some(x), Some(y));
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Error)
        .init();
    uthread::init(main_thread, 0);
}
