// SPDX-License-Identifier: Apache-2.0

//! CPU-affinity and GPU-visibility scoping for a single task invocation
//! (§4.4).

mod nix_binder;

pub use nix_binder::NixResourceBinder;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResourceBinder, ResourceBinderCall};

use thiserror::Error;

pub const ENV_BINDED_CPUS: &str = "COMPSS_BINDED_CPUS";
pub const ENV_BINDED_GPUS: &str = "COMPSS_BINDED_GPUS";
pub const ENV_CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";
pub const ENV_GPU_DEVICE_ORDINAL: &str = "GPU_DEVICE_ORDINAL";
pub const ENV_HOSTNAMES: &str = "COMPSS_HOSTNAMES";

/// Wire sentinel meaning "no binding requested" (§6).
pub const NO_BINDING: &str = "-";

#[derive(Debug, Error)]
pub enum BindError {
    #[error("failed to set CPU affinity for mask {mask:?}: {reason}")]
    Affinity { mask: String, reason: String },
    #[error("CPU mask {0:?} contains a non-numeric id")]
    InvalidMask(String),
}

/// What a task asked to be bound to, straight off the wire (cpu mask, gpu
/// mask — both may be the [`NO_BINDING`] sentinel).
#[derive(Debug, Clone, Default)]
pub struct ResourceBinding {
    pub cpus_bound: bool,
    pub gpus_bound: bool,
}

/// Scopes CPU affinity and GPU visibility to a single task and cleans up
/// afterward.
///
/// `bind_cpus` failure is non-fatal by contract: the caller logs a warning
/// and proceeds with the platform default affinity (§4.4).
pub trait ResourceBinder: Send + Sync {
    /// Parse a comma-separated CPU id list, set process affinity, and set
    /// `COMPSS_BINDED_CPUS`. Returns `Err` on failure, which the caller must
    /// treat as a warning, not a fatal error.
    fn bind_cpus(&self, mask: &str) -> Result<(), BindError>;

    /// Set `COMPSS_BINDED_GPUS`, `CUDA_VISIBLE_DEVICES`, and
    /// `GPU_DEVICE_ORDINAL` to `mask` verbatim. No kernel affinity call is
    /// made.
    fn bind_gpus(&self, mask: &str);

    /// Unset every variable this binder may have set. Variables that were
    /// never set (the caller passed [`NO_BINDING`]) are left untouched.
    /// `COMPSS_HOSTNAMES` is always unset.
    fn clean_environment(&self, cpus_mask: &str, gpus_mask: &str);

    /// Apply both bindings for a task, given the wire-level cpu/gpu masks.
    /// Returns the record of what was actually bound, for the executor to
    /// pair with `clean_environment` later.
    fn bind(&self, cpu_mask: &str, gpu_mask: &str) -> ResourceBinding {
        let mut binding = ResourceBinding::default();
        if cpu_mask != NO_BINDING {
            match self.bind_cpus(cpu_mask) {
                Ok(()) => binding.cpus_bound = true,
                Err(err) => {
                    tracing::warn!(%err, mask = cpu_mask, "CPU affinity binding failed, continuing with default affinity");
                }
            }
        }
        if gpu_mask != NO_BINDING {
            self.bind_gpus(gpu_mask);
            binding.gpus_bound = true;
        }
        binding
    }
}

fn parse_cpu_mask(mask: &str) -> Result<Vec<usize>, BindError> {
    mask.split(',')
        .map(|tok| {
            tok.trim()
                .parse::<usize>()
                .map_err(|_| BindError::InvalidMask(mask.to_string()))
        })
        .collect()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
