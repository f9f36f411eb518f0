//! A second call to `init` within the same process must abort with
//! `FATAL_REINIT`, never silently reset scheduler state. Driven as a
//! subprocess for the same reason as `tests/deadlock.rs`.

use std::process::Command;

#[test]
fn second_init_call_triggers_fatal_reinit() {
    let output = Command::new(env!("CARGO_BIN_EXE_reinit_fixture"))
        .output()
        .expect("failed to run reinit_fixture");

    assert!(
        !output.status.success(),
        "expected the reinit fixture to abort, got status {:?}",
        output.status
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("FATAL_REINIT"),
        "expected a FATAL_REINIT diagnostic on stderr, got: {stderr}"
    );
}
