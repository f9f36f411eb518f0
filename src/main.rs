//! Host demo: a handful of worker threads that yield in a round-robin
//! ping-pong, one of which is joined on before the rest finish, exercising
//! `spawn`, `yield_now`, `join`, `current`, and the preemption timer
//! end-to-end.

fn worker(n: usize) {
    for round in 0..3 {
        log::info!("{} (#{n}) round {round}", uthread::current().name());
        uthread::yield_now();
    }
}

fn main_thread(_: usize) {
    log::info!("main thread started, spawning workers");
    let mut handles = Vec::new();
    for n in 0..4 {
        handles.push(uthread::spawn(format!("worker-{n}"), worker, n));
    }

    let first = handles.remove(0);
    first.join();
    log::info!("worker-0 joined early");

    for handle in handles {
        handle.join();
    }
    log::info!("all workers joined, main thread exiting");
}

fn main() {
    env_logger::init();
    uthread::init(main_thread, 0);
}
