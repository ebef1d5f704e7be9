//! Fatal-protocol-error specs (S6, §7 error taxonomy #1).

use crate::prelude::WorkerHarness;

#[test]
fn an_unknown_tag_posts_exception_and_exits_non_zero() {
    let harness = WorkerHarness::new();
    let run = harness.run(&["FOO bar"]);

    run.assert_faulted();
    assert_eq!(run.exceptions, "EXCEPTION\n");
    assert!(run.reply.is_empty(), "no reply is owed for a command that was never valid");
}

#[test]
fn a_truncated_execute_task_posts_exception_and_exits_non_zero() {
    let harness = WorkerHarness::new();
    let run = harness.run(&["EXECUTE_TASK too short"]);

    run.assert_faulted();
    assert_eq!(run.exceptions, "EXCEPTION\n");
}
