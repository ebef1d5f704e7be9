// SPDX-License-Identifier: Apache-2.0

//! Per-task environment variables (§4.9, §6) that are not resource-binding
//! related — node topology and thread counts. [`piper_adapters::ResourceBinder`]
//! owns `COMPSS_BINDED_CPUS`/`COMPSS_BINDED_GPUS`/`CUDA_VISIBLE_DEVICES`/
//! `GPU_DEVICE_ORDINAL`; this module owns the rest, and always unsets them on
//! cleanup regardless of the sentinel (§6: "All are unset on task exit
//! except as noted in §4.4 when the sentinel is `-`" — that carve-out is
//! specific to the binder's CPU/GPU vars, not these).

pub const ENV_NUM_NODES: &str = "COMPSS_NUM_NODES";
pub const ENV_HOSTNAMES: &str = "COMPSS_HOSTNAMES";
pub const ENV_NUM_THREADS: &str = "COMPSS_NUM_THREADS";
pub const ENV_OMP_NUM_THREADS: &str = "OMP_NUM_THREADS";

/// Sets the task-scoped topology/thread-count environment for the duration
/// of a single `EXECUTE_TASK` invocation.
pub fn set_task_env(hostnames: &[String], compute_units: &str) {
    std::env::set_var(ENV_NUM_NODES, hostnames.len().to_string());
    std::env::set_var(ENV_HOSTNAMES, hostnames.join(","));
    std::env::set_var(ENV_NUM_THREADS, compute_units);
    std::env::set_var(ENV_OMP_NUM_THREADS, compute_units);
}

/// Unconditionally unsets every variable [`set_task_env`] may have set
/// (I4: task env is always cleaned up, win or lose).
pub fn clean_task_env() {
    std::env::remove_var(ENV_NUM_NODES);
    std::env::remove_var(ENV_HOSTNAMES);
    std::env::remove_var(ENV_NUM_THREADS);
    std::env::remove_var(ENV_OMP_NUM_THREADS);
}

#[cfg(test)]
#[path = "env_vars_tests.rs"]
mod tests;
