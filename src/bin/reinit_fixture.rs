//! Fixture binary for the reinit integration test (`tests/reinit.rs`).
//!
//! Calls `init` twice in the same process; the second call must abort with
//! `FATAL_REINIT` rather than silently resetting scheduler state.

fn idle_main(_: usize) {}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Error)
        .init();
    uthread::init(idle_main, 0);
    uthread::init(idle_main, 0);
}
