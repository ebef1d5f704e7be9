use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use piper_adapters::cache::NoCache;
use piper_adapters::TaskDispatchRequest;
use piper_core::{parse_execute_task, TaskCommandError};
use tempfile::tempdir;

use super::ProcessTaskDispatcher;
use piper_adapters::TaskDispatcher;

fn write_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn sample_command() -> Result<piper_core::ExecuteTaskCommand, TaskCommandError> {
    let line = "EXECUTE_TASK 42 out err false 7 false null METHOD mod fn 100 1 nodeA 4 true null 0 - - -";
    let tokens: Vec<&str> = line.split_whitespace().collect();
    parse_execute_task(&tokens)
}

fn base_request<'a>(command: &'a piper_core::ExecuteTaskCommand) -> TaskDispatchRequest<'a> {
    TaskDispatchRequest {
        command,
        process_name: "worker-0".to_string(),
        storage_conf: "null".to_string(),
        tracing_enabled: false,
        logger_name: "piper.worker".to_string(),
        logger_config_path: None,
        out_path: PathBuf::from("/tmp/out"),
        err_path: PathBuf::from("/tmp/err"),
        profiler_enabled: false,
        cache_reader: Arc::new(NoCache),
        cache_queue: Arc::new(NoCache),
    }
}

#[test]
fn success_exit_parses_param_return_encoding_from_stdout() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "runner.sh", "echo '9 null'\nexit 0");
    let dispatcher = ProcessTaskDispatcher::new(script);
    let command = sample_command().unwrap();
    let outcome = dispatcher.dispatch(&base_request(&command));

    assert_eq!(outcome.exit_value, 0);
    assert_eq!(outcome.new_types, vec!["9".to_string()]);
    assert_eq!(outcome.new_values, vec!["null".to_string()]);
    assert!(outcome.exception_message.is_none());
}

#[test]
fn domain_exception_exit_carries_stderr_as_message() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), "runner.sh", "echo 'boom reason' 1>&2\nexit 2");
    let dispatcher = ProcessTaskDispatcher::new(script);
    let command = sample_command().unwrap();
    let outcome = dispatcher.dispatch(&base_request(&command));

    assert_eq!(outcome.exit_value, 2);
    assert_eq!(outcome.exception_message.as_deref(), Some("boom reason"));
}

#[test]
fn missing_task_runner_reports_a_nonzero_exit() {
    let dispatcher = ProcessTaskDispatcher::new(PathBuf::from("/nonexistent/task-runner"));
    let command = sample_command().unwrap();
    let outcome = dispatcher.dispatch(&base_request(&command));

    assert_ne!(outcome.exit_value, 0);
    assert!(outcome.exception_message.is_some());
}
