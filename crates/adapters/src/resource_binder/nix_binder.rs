// SPDX-License-Identifier: Apache-2.0

//! Real resource binder backed by `nix::sched::sched_setaffinity`.

use nix::sched::{sched_setaffinity, CpuSet};
use nix::unistd::Pid;

use super::{
    parse_cpu_mask, BindError, ResourceBinder, ENV_BINDED_CPUS, ENV_BINDED_GPUS,
    ENV_CUDA_VISIBLE_DEVICES, ENV_GPU_DEVICE_ORDINAL, ENV_HOSTNAMES, NO_BINDING,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct NixResourceBinder;

impl NixResourceBinder {
    pub fn new() -> Self {
        Self
    }
}

impl ResourceBinder for NixResourceBinder {
    fn bind_cpus(&self, mask: &str) -> Result<(), BindError> {
        let cpus = parse_cpu_mask(mask)?;
        let mut cpu_set = CpuSet::new();
        for cpu in &cpus {
            cpu_set
                .set(*cpu)
                .map_err(|e| BindError::Affinity {
                    mask: mask.to_string(),
                    reason: e.to_string(),
                })?;
        }
        sched_setaffinity(Pid::from_raw(0), &cpu_set).map_err(|e| BindError::Affinity {
            mask: mask.to_string(),
            reason: e.to_string(),
        })?;
        // SAFETY-equivalent note: mutating process env is inherently racy
        // under concurrent threads, but the executor loop is single-threaded
        // by contract (§5).
        std::env::set_var(ENV_BINDED_CPUS, mask);
        Ok(())
    }

    fn bind_gpus(&self, mask: &str) {
        std::env::set_var(ENV_BINDED_GPUS, mask);
        std::env::set_var(ENV_CUDA_VISIBLE_DEVICES, mask);
        std::env::set_var(ENV_GPU_DEVICE_ORDINAL, mask);
    }

    fn clean_environment(&self, cpus_mask: &str, gpus_mask: &str) {
        if cpus_mask != NO_BINDING {
            std::env::remove_var(ENV_BINDED_CPUS);
        }
        if gpus_mask != NO_BINDING {
            std::env::remove_var(ENV_BINDED_GPUS);
            std::env::remove_var(ENV_CUDA_VISIBLE_DEVICES);
            std::env::remove_var(ENV_GPU_DEVICE_ORDINAL);
        }
        std::env::remove_var(ENV_HOSTNAMES);
    }
}

#[cfg(test)]
#[path = "nix_binder_tests.rs"]
mod tests;
