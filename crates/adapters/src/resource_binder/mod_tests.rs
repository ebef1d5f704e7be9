// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn parse_cpu_mask_accepts_comma_separated_ids() {
    assert_eq!(parse_cpu_mask("0,1,2").unwrap(), vec![0, 1, 2]);
}

#[test]
fn parse_cpu_mask_rejects_non_numeric_tokens() {
    assert!(parse_cpu_mask("0,x,2").is_err());
}

#[test]
fn bind_skips_no_binding_sentinel() {
    let binder = FakeResourceBinder::new();
    let binding = binder.bind(NO_BINDING, NO_BINDING);
    assert!(!binding.cpus_bound);
    assert!(!binding.gpus_bound);
    assert!(binder.calls().is_empty());
}

#[test]
fn bind_applies_both_masks() {
    let binder = FakeResourceBinder::new();
    let binding = binder.bind("0,1", "0");
    assert!(binding.cpus_bound);
    assert!(binding.gpus_bound);
    assert_eq!(
        binder.calls(),
        vec![
            ResourceBinderCall::BindCpus("0,1".to_string()),
            ResourceBinderCall::BindGpus("0".to_string()),
        ]
    );
}

/// §4.4: a cpu-bind failure is non-fatal — the task still runs unbound.
#[test]
fn bind_cpu_failure_is_non_fatal() {
    let binder = FakeResourceBinder::failing_cpu_bind();
    let binding = binder.bind("0,1", NO_BINDING);
    assert!(!binding.cpus_bound);
}
