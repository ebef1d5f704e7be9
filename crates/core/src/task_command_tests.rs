// SPDX-License-Identifier: Apache-2.0

use super::*;

/// Builds a well-formed `EXECUTE_TASK` token stream from field values, so
/// tests stay correct as the header width changes rather than hand-counting
/// whitespace in a literal string.
struct TokenBuilder {
    parts: Vec<String>,
}

impl TokenBuilder {
    fn new(job_id: &str, job_out: &str, job_err: &str) -> Self {
        Self {
            parts: vec![
                TAG_EXECUTE_TASK.to_string(),
                job_id.to_string(),
                job_out.to_string(),
                job_err.to_string(),
            ],
        }
    }

    fn push(mut self, token: impl Into<String>) -> Self {
        self.parts.push(token.into());
        self
    }

    fn hostnames(mut self, hosts: &[&str]) -> Self {
        self.parts.push(hosts.len().to_string());
        for h in hosts {
            self.parts.push(h.to_string());
        }
        self
    }

    fn params(mut self, params: &[(&str, &str, &str, &str)]) -> Self {
        self.parts.push(params.len().to_string());
        for (t, s, p, v) in params {
            self.parts.push(t.to_string());
            self.parts.push(s.to_string());
            self.parts.push(p.to_string());
            self.parts.push(v.to_string());
        }
        self
    }

    fn as_refs(&self) -> Vec<&str> {
        self.parts.iter().map(|s| s.as_str()).collect()
    }
}

fn sample_command() -> TokenBuilder {
    TokenBuilder::new("42", "/t/o", "/t/e")
        .push("false") // tracing
        .push("42") // task id
        .push("false") // debug
        .push("null") // storage conf
        .push("METHOD")
        .push("mod")
        .push("fn")
        .push("0") // timeout
        .hostnames(&["host1"])
        .push("2") // compute units
        .push("false") // has_target
        .push(ABSENT_VALUE) // has_return sentinel
}

/// S1: a zero-parameter, single-node task.
#[test]
fn parses_minimal_execute_task() {
    let tokens = sample_command()
        .params(&[])
        .push("0,1") // cpu mask
        .push("-") // gpu mask
        .push("reserved");
    let cmd = parse_execute_task(&tokens.as_refs()).expect("parses");

    assert_eq!(cmd.job_id, "42");
    assert_eq!(cmd.job_out, "/t/o");
    assert_eq!(cmd.job_err, "/t/e");
    assert!(!cmd.tracing_enabled);
    assert!(!cmd.debug);
    assert_eq!(cmd.storage_conf, "null");
    assert_eq!(cmd.operation_type, "METHOD");
    assert_eq!(cmd.module_name, "mod");
    assert_eq!(cmd.method_name, "fn");
    assert_eq!(cmd.hostnames, vec!["host1".to_string()]);
    assert_eq!(cmd.compute_units, "2");
    assert!(!cmd.has_target);
    assert_eq!(cmd.param_count, 0);
    assert!(cmd.params.is_empty());
    assert_eq!(cmd.cpu_mask, "0,1");
    assert_eq!(cmd.gpu_mask, "-");
}

#[test]
fn parses_parameters_in_order() {
    let tokens = sample_command()
        .params(&[
            ("FILE_T", "UNSPECIFIED", "null", "/tmp/a"),
            ("INT_T", "UNSPECIFIED", "null", "7"),
        ])
        .push("-")
        .push("-")
        .push("reserved");
    let cmd = parse_execute_task(&tokens.as_refs()).expect("parses");

    assert_eq!(cmd.param_count, 2);
    assert_eq!(cmd.params[0].content_type, "FILE_T");
    assert_eq!(cmd.params[0].value, "/tmp/a");
    assert_eq!(cmd.params[1].content_type, "INT_T");
    assert_eq!(cmd.params[1].value, "7");
}

#[test]
fn multi_node_hostnames_are_consumed_before_tail() {
    let tokens = TokenBuilder::new("1", "/o", "/e")
        .push("false")
        .push("1")
        .push("false")
        .push("null")
        .push("METHOD")
        .push("mod")
        .push("fn")
        .push("0")
        .hostnames(&["host1", "host2", "host3"])
        .push("4")
        .push("true")
        .push(ABSENT_VALUE)
        .params(&[])
        .push("-")
        .push("-")
        .push("reserved");
    let cmd = parse_execute_task(&tokens.as_refs()).expect("parses");
    assert_eq!(
        cmd.hostnames,
        vec!["host1".to_string(), "host2".to_string(), "host3".to_string()]
    );
    assert!(cmd.has_target);
}

#[test]
fn rejects_wrong_tag() {
    let err = parse_execute_task(&["PING"]).unwrap_err();
    assert_eq!(err, TaskCommandError::WrongTag("PING".to_string()));
}

#[test]
fn rejects_empty_token_stream() {
    let err = parse_execute_task(&[]).unwrap_err();
    assert_eq!(err, TaskCommandError::Empty);
}

#[test]
fn rejects_truncated_header() {
    let err = parse_execute_task(&["EXECUTE_TASK", "1", "/o"]).unwrap_err();
    assert!(matches!(err, TaskCommandError::Truncated { .. }));
}

#[test]
fn rejects_non_sentinel_return_token() {
    let tokens = sample_command();
    let mut parts = tokens.parts.clone();
    // Overwrite the has-return sentinel with a bogus value.
    let last = parts.len() - 1;
    parts[last] = "garbage".to_string();
    let refs: Vec<&str> = parts.iter().map(|s| s.as_str()).collect();
    let err = parse_execute_task(&refs).unwrap_err();
    assert!(matches!(err, TaskCommandError::UnexpectedReturnToken(_)));
}

/// S1: success reply shape.
#[test]
fn renders_success_reply() {
    let outcome = classify_exit_value(0, String::new(), None);
    assert_eq!(render_reply("42", &outcome), "endTask 42 0 \n");
}

/// S2: domain exception reply shape, spaces replaced by underscores.
#[test]
fn renders_domain_exception_reply() {
    let outcome = classify_exit_value(2, String::new(), Some("boom reason".to_string()));
    assert_eq!(outcome, TaskOutcome::DomainException { message: "boom reason".to_string() });
    assert_eq!(render_reply("42", &outcome), "compssExceptionTask 42 boom_reason\n");
}

/// S3: any other exit value reports `endTask <job_id> <exit_value>`.
#[test]
fn renders_other_exception_reply() {
    let outcome = classify_exit_value(7, String::new(), None);
    assert_eq!(outcome, TaskOutcome::OtherException { exit_value: 7 });
    assert_eq!(render_reply("42", &outcome), "endTask 42 7\n");
}

#[test]
fn success_reply_carries_param_return_encoding() {
    let outcome = classify_exit_value(0, "FILE null OBJECT psco-1".to_string(), None);
    assert_eq!(
        render_reply("9", &outcome),
        "endTask 9 0 FILE null OBJECT psco-1\n"
    );
}
