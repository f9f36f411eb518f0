//! Scenario 5: `main` creates W1 (which waits on W2) before W2 exists, then
//! creates W2. W1's `join` only runs once W2's handle has been published,
//! which always happens-before W1 is first scheduled, since `main` performs
//! every setup step without yielding in between.

use std::sync::Mutex;

static LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());
static W2_HANDLE: Mutex<Option<uthread::JoinHandle>> = Mutex::new(None);

fn w1_thread(_: usize) {
    let w2 = W2_HANDLE
        .lock()
        .unwrap()
        .take()
        .expect("w2's handle is published before w1 ever runs");
    w2.join();
    LOG.lock().unwrap().push("1");
}

fn w2_thread(_: usize) {
    LOG.lock().unwrap().push("2");
}

fn main_thread(_: usize) {
    let w1 = uthread::spawn("W1", w1_thread, 0);
    let w2 = uthread::spawn("W2", w2_thread, 0);
    *W2_HANDLE.lock().unwrap() = Some(w2);
    w1.join();
}

#[test]
fn w1_resumes_only_after_w2_terminates() {
    uthread::init(main_thread, 0);
    let log = LOG.lock().unwrap();
    assert_eq!(*log, vec!["2", "1"]);
}
