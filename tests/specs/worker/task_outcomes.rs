//! `EXECUTE_TASK` reply-shape specs (S1, S2, S3, I1).

use crate::prelude::{execute_task_line, WorkerHarness};

#[test]
fn success_reply_carries_the_param_return_encoding() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();
    let task = execute_task_line("42", &job_out, &job_err, "okReturn", "0,1", "-", "2");

    let run = harness.run(&[&task, "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "endTask 42 0 9 null\nQUIT\n");
    assert!(run.exceptions.is_empty());
}

#[test]
fn domain_exception_reply_underscores_the_message() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();
    let task = execute_task_line("42", &job_out, &job_err, "domainBoom", "-", "-", "1");

    let run = harness.run(&[&task, "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "compssExceptionTask 42 boom_reason\nQUIT\n");
}

#[test]
fn other_exception_reply_carries_the_raw_exit_value() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();
    let task = execute_task_line("42", &job_out, &job_err, "otherBoom", "-", "-", "1");

    let run = harness.run(&[&task, "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "endTask 42 7\nQUIT\n");
}

#[test]
fn the_loop_survives_a_task_failure_and_keeps_serving_later_commands() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();
    let failing = execute_task_line("1", &job_out, &job_err, "otherBoom", "-", "-", "1");
    let succeeding = execute_task_line("2", &job_out, &job_err, "okReturn", "-", "-", "1");

    let run = harness.run(&[&failing, &succeeding, "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "endTask 1 7\nendTask 2 0 9 null\nQUIT\n");
}
