//! PING and QUIT lifecycle specs (S4, S5, I6).

use crate::prelude::WorkerHarness;

#[test]
fn ping_replies_pong_and_quit_replies_quit() {
    let harness = WorkerHarness::new();
    let run = harness.run(&["PING", "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "PONG\nQUIT\n");
    assert!(run.exceptions.is_empty(), "no exception on a clean lifecycle");
}

#[test]
fn quit_alone_exits_cleanly() {
    let harness = WorkerHarness::new();
    let run = harness.run(&["QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "QUIT\n");
}

#[test]
fn ping_between_two_tasks_does_not_perturb_the_reply_stream() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();
    let first = crate::prelude::execute_task_line("1", &job_out, &job_err, "okReturn", "-", "-", "2");
    let second = crate::prelude::execute_task_line("2", &job_out, &job_err, "okReturn", "-", "-", "2");

    let run = harness.run(&[&first, "PING", &second, "QUIT"]);

    run.assert_clean_quit();
    assert_eq!(run.reply, "endTask 1 0 9 null\nPONG\nendTask 2 0 9 null\nQUIT\n");
}
