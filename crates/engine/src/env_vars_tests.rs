use serial_test::serial;

use super::*;

#[test]
#[serial(task_env)]
fn set_task_env_writes_all_four_vars() {
    clean_task_env();
    set_task_env(&["nodeA".to_string(), "nodeB".to_string()], "4");

    assert_eq!(std::env::var(ENV_NUM_NODES).unwrap(), "2");
    assert_eq!(std::env::var(ENV_HOSTNAMES).unwrap(), "nodeA,nodeB");
    assert_eq!(std::env::var(ENV_NUM_THREADS).unwrap(), "4");
    assert_eq!(std::env::var(ENV_OMP_NUM_THREADS).unwrap(), "4");

    clean_task_env();
}

#[test]
#[serial(task_env)]
fn clean_task_env_unsets_everything() {
    set_task_env(&["only".to_string()], "1");
    clean_task_env();

    assert!(std::env::var(ENV_NUM_NODES).is_err());
    assert!(std::env::var(ENV_HOSTNAMES).is_err());
    assert!(std::env::var(ENV_NUM_THREADS).is_err());
    assert!(std::env::var(ENV_OMP_NUM_THREADS).is_err());
}
