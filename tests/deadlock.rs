//! Scenario 6: X waits on Y and Y waits on X. The scheduler must detect the
//! deadlock and abort the process rather than hang forever, so this drives
//! a dedicated fixture binary as a subprocess and inspects how it died.

use std::process::Command;

#[test]
fn mutual_wait_triggers_fatal_deadlock() {
    let output = Command::new(env!("CARGO_BIN_EXE_deadlock_fixture"))
        .output()
        .expect("failed to run deadlock_fixture");

    assert!(
        !output.status.success(),
        "expected the deadlock fixture to abort, got status {:?}",
        output.status
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("FATAL_DEADLOCK"),
        "expected a FATAL_DEADLOCK diagnostic on stderr, got: {stderr}"
    );
}
