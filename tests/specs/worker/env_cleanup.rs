//! Resource/environment cleanup specs (I4): nothing a task's binding set
//! leaks into the next task's environment.

use crate::prelude::{execute_task_line, WorkerHarness};

#[test]
fn bound_cpu_and_gpu_env_do_not_leak_into_the_next_unbound_task() {
    let harness = WorkerHarness::new();
    let job_out = harness.job_out_path();
    let job_err = harness.job_err_path();

    let bound = execute_task_line("1", &job_out, &job_err, "dumpEnv", "0,1", "0", "2");
    let unbound = execute_task_line("2", &job_out, &job_err, "dumpEnv", "-", "-", "1");

    let run = harness.run(&[&bound, &unbound, "QUIT"]);
    run.assert_clean_quit();

    let dump = harness.env_dump();
    let records: Vec<&str> = dump.lines().collect();
    // Six env lines per dumpEnv invocation, two invocations.
    assert_eq!(records.len(), 12, "dump:\n{dump}");

    let first = &records[0..6];
    assert_eq!(first[0], "CPUS=0,1");
    assert_eq!(first[1], "GPUS=0");
    assert_eq!(first[2], "CUDA=0");
    assert_eq!(first[3], "HOSTNAMES=nodeA");
    assert_eq!(first[4], "NODES=1");
    assert_eq!(first[5], "THREADS=2");

    let second = &records[6..12];
    assert_eq!(second[0], "CPUS=unset", "CPU binding from task 1 leaked into task 2");
    assert_eq!(second[1], "GPUS=unset", "GPU binding from task 1 leaked into task 2");
    assert_eq!(second[2], "CUDA=unset", "CUDA_VISIBLE_DEVICES leaked into task 2");
    assert_eq!(second[3], "HOSTNAMES=nodeA");
    assert_eq!(second[4], "NODES=1");
    assert_eq!(second[5], "THREADS=1");
}
