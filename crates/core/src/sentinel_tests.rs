// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn sentinels_are_distinct() {
    let all = [
        NO_BINDING,
        ABSENT_VALUE,
        ABSENT_PARAM,
        UNDEFINED_CONTENT_TYPE,
        TAG_EXECUTE_TASK,
        TAG_END_TASK,
        TAG_COMPSS_EXCEPTION,
        TAG_PING,
        TAG_PONG,
        TAG_QUIT,
        SUPERVISOR_EXCEPTION,
    ];
    for (i, a) in all.iter().enumerate() {
        for (j, b) in all.iter().enumerate() {
            if i != j {
                assert_ne!(a, b, "sentinel collision between {a} and {b}");
            }
        }
    }
}
