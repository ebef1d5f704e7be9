//! Test helpers for the worker's black-box behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::cargo::CommandCargoExt;

/// A fake task-runner script standing in for the native task registry
/// (§4.8 is an external contract; we do not reimplement it). Dispatches on
/// the method name, the third argv token `piper-worker` passes through
/// (§4.9 operation_type, module_name, method_name).
const TASK_RUNNER_SCRIPT: &str = r#"#!/bin/sh
set -eu
method="$3"
case "$method" in
  okReturn)
    echo "9 null"
    exit 0
    ;;
  domainBoom)
    echo "boom reason" 1>&2
    exit 2
    ;;
  otherBoom)
    exit 7
    ;;
  dumpEnv)
    {
      echo "CPUS=${COMPSS_BINDED_CPUS:-unset}"
      echo "GPUS=${COMPSS_BINDED_GPUS:-unset}"
      echo "CUDA=${CUDA_VISIBLE_DEVICES:-unset}"
      echo "HOSTNAMES=${COMPSS_HOSTNAMES:-unset}"
      echo "NODES=${COMPSS_NUM_NODES:-unset}"
      echo "THREADS=${COMPSS_NUM_THREADS:-unset}"
    } >> "$PIPER_ENV_DUMP_FILE"
    exit 0
    ;;
  *)
    exit 0
    ;;
esac
"#;

/// A harness worker process: a temp directory with an input/output pipe
/// pair, an exception queue, a generated config, and a fake task runner.
pub struct WorkerHarness {
    dir: tempfile::TempDir,
    process_name: String,
}

impl WorkerHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner_path = dir.path().join("task-runner.sh");
        std::fs::write(&runner_path, TASK_RUNNER_SCRIPT).expect("write task runner");
        make_executable(&runner_path);

        let config = serde_json::json!({
            "debug": false,
            "tmp_dir": dir.path(),
            "tracing_enabled": true,
            "storage_conf": serde_json::Value::Null,
            "logger_name": "piper.worker.spec",
            "logger_config_path": serde_json::Value::Null,
            "persistent_storage": false,
            "storage_loggers": [],
            "streaming": serde_json::Value::Null,
            "profiler_enabled": false,
        });
        std::fs::write(dir.path().join("config.json"), config.to_string()).expect("write config");

        Self {
            dir,
            process_name: "worker-0".to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn exception_queue_path(&self) -> PathBuf {
        self.dir.path().join("exceptions")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn task_runner_path(&self) -> PathBuf {
        self.dir.path().join("task-runner.sh")
    }

    pub fn job_out_path(&self) -> PathBuf {
        self.dir.path().join("job.out")
    }

    pub fn job_err_path(&self) -> PathBuf {
        self.dir.path().join("job.err")
    }

    /// Write `lines` (newline-joined) as the full command stream the
    /// runtime would have written to the input pipe, then run the worker
    /// to completion and capture its reply stream + exit status.
    pub fn run(&self, lines: &[&str]) -> WorkerRun {
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(self.input_path(), content).expect("write command file");

        let mut cmd = Command::cargo_bin("piper-worker").expect("locate piper-worker binary");
        cmd.arg(&self.process_name)
            .arg(self.input_path())
            .arg(self.output_path())
            .arg(self.exception_queue_path())
            .arg(self.config_path())
            .arg(self.task_runner_path())
            .env("PIPER_ENV_DUMP_FILE", self.dir.path().join("env_dump"));

        let output = cmd
            .output()
            .expect("piper-worker should spawn and exit within its own accord");

        WorkerRun {
            status_code: output.status.code(),
            reply: std::fs::read_to_string(self.output_path()).unwrap_or_default(),
            exceptions: std::fs::read_to_string(self.exception_queue_path()).unwrap_or_default(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn env_dump(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("env_dump")).unwrap_or_default()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// Outcome of running the worker to completion.
pub struct WorkerRun {
    pub status_code: Option<i32>,
    pub reply: String,
    pub exceptions: String,
    pub stderr: String,
}

impl WorkerRun {
    pub fn assert_clean_quit(&self) -> &Self {
        assert_eq!(self.status_code, Some(0), "stderr: {}", self.stderr);
        self
    }

    pub fn assert_faulted(&self) -> &Self {
        assert_eq!(self.status_code, Some(1), "stderr: {}", self.stderr);
        self
    }
}

/// Build a literal `EXECUTE_TASK` command line (§4.9 token layout), with a
/// single-node topology and zero parameters — parameter-triple parsing is
/// covered at the unit level (`task_command_tests.rs`); these specs only
/// need the header/task-lifecycle behavior.
#[allow(clippy::too_many_arguments)]
pub fn execute_task_line(
    job_id: &str,
    job_out: &Path,
    job_err: &Path,
    method: &str,
    cpu_mask: &str,
    gpu_mask: &str,
    compute_units: &str,
) -> String {
    format!(
        "EXECUTE_TASK {job_id} {} {} false {job_id} false null METHOD piper.spec {method} 0 1 nodeA {compute_units} true null 0 {cpu_mask} {gpu_mask} reserved",
        job_out.display(),
        job_err.display(),
    )
}

