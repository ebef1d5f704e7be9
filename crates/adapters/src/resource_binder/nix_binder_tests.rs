// SPDX-License-Identifier: Apache-2.0

use serial_test::serial;

use super::*;

/// The current process' own affinity mask is always a valid, bindable set,
/// so binding to cpu 0 (present on every host that can run these tests) is
/// representative without requiring a specific core count.
#[test]
#[serial(resource_env)]
fn bind_cpus_sets_env_var() {
    let binder = NixResourceBinder::new();
    binder.bind_cpus("0").expect("binds to cpu 0");
    assert_eq!(std::env::var(ENV_BINDED_CPUS).unwrap(), "0");
    binder.clean_environment("0", NO_BINDING);
    assert!(std::env::var(ENV_BINDED_CPUS).is_err());
}

#[test]
#[serial(resource_env)]
fn bind_gpus_sets_all_three_env_vars() {
    let binder = NixResourceBinder::new();
    binder.bind_gpus("0,1");
    assert_eq!(std::env::var(ENV_BINDED_GPUS).unwrap(), "0,1");
    assert_eq!(std::env::var(ENV_CUDA_VISIBLE_DEVICES).unwrap(), "0,1");
    assert_eq!(std::env::var(ENV_GPU_DEVICE_ORDINAL).unwrap(), "0,1");
    binder.clean_environment(NO_BINDING, "0,1");
    assert!(std::env::var(ENV_BINDED_GPUS).is_err());
    assert!(std::env::var(ENV_CUDA_VISIBLE_DEVICES).is_err());
    assert!(std::env::var(ENV_GPU_DEVICE_ORDINAL).is_err());
}

#[test]
#[serial(resource_env)]
fn clean_environment_leaves_unbound_vars_untouched() {
    std::env::set_var(ENV_BINDED_CPUS, "sentinel");
    let binder = NixResourceBinder::new();
    // cpus_mask is the no-binding sentinel: COMPSS_BINDED_CPUS must survive.
    binder.clean_environment(NO_BINDING, NO_BINDING);
    assert_eq!(std::env::var(ENV_BINDED_CPUS).unwrap(), "sentinel");
    std::env::remove_var(ENV_BINDED_CPUS);
}

#[test]
#[serial(resource_env)]
fn clean_environment_always_unsets_hostnames() {
    std::env::set_var(ENV_HOSTNAMES, "host1,host2");
    let binder = NixResourceBinder::new();
    binder.clean_environment(NO_BINDING, NO_BINDING);
    assert!(std::env::var(ENV_HOSTNAMES).is_err());
}

#[test]
fn bind_cpus_rejects_invalid_mask() {
    let binder = NixResourceBinder::new();
    assert!(binder.bind_cpus("not-a-cpu-list").is_err());
}
