// SPDX-License-Identifier: Apache-2.0

//! Core-element record: the per-task implementation descriptor handed to
//! the native runtime (§3, §4.3).
//!
//! In the original binding this is built by a stack of decorators that each
//! mutate a shared `kwargs[CORE_ELEMENT_KEY]` entry. We replace that with an
//! explicit builder: a capability attaches its descriptor to a
//! [`CoreElementBuilder`], and the outermost layer materializes the
//! [`CoreElement`] before dispatch (§9, "Decorator stacks → builder chain").

use crate::sentinel::ABSENT_PARAM;

/// Implementation kind tag understood by the native runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplType {
    Binary,
    Mpi,
    MpmdMpi,
    OmpSs,
    Http,
    Method,
}

impl ImplType {
    pub fn as_runtime_tag(self) -> &'static str {
        match self {
            ImplType::Binary => "BINARY",
            ImplType::Mpi => "MPI",
            ImplType::MpmdMpi => "MPMDMPI",
            ImplType::OmpSs => "OMPSS",
            ImplType::Http => "HTTP",
            ImplType::Method => "METHOD",
        }
    }
}

/// How many MPI processes to launch, as the decorator received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCount {
    Fixed(u32),
    /// `$NAME` — resolved from an environment variable at dispatch time.
    EnvVar(String),
    /// No explicit count given; the configured default applies.
    Default,
}

impl ProcessCount {
    fn to_signature_token(&self, default: u32) -> String {
        match self {
            ProcessCount::Fixed(n) => n.to_string(),
            ProcessCount::EnvVar(name) => format!("${name}"),
            ProcessCount::Default => default.to_string(),
        }
    }
}

/// One program entry of an MPMD-MPI task (§4.3 impl_type_args layout).
#[derive(Debug, Clone)]
pub struct MpmdProgram {
    pub binary: String,
    /// `None` encodes the `#` absent-parameter placeholder.
    pub params: Option<String>,
    pub processes: Option<String>,
}

/// Per-task implementation metadata consumed by the native runtime.
///
/// A core element is created at most once per task invocation: if an outer
/// decorator already attached one, it is mutated in place, otherwise a fresh
/// one is created and attached (§4.3).
#[derive(Debug, Clone, Default)]
pub struct CoreElement {
    impl_type: Option<ImplType>,
    impl_signature: Option<String>,
    impl_type_args: Vec<String>,
}

impl CoreElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_impl_type(&mut self, impl_type: ImplType) {
        self.impl_type = Some(impl_type);
    }

    pub fn set_impl_signature(&mut self, signature: String) {
        self.impl_signature = Some(signature);
    }

    pub fn set_impl_type_args(&mut self, args: Vec<String>) {
        self.impl_type_args = args;
    }

    pub fn impl_type(&self) -> Option<ImplType> {
        self.impl_type
    }

    pub fn impl_signature(&self) -> Option<&str> {
        self.impl_signature.as_deref()
    }

    pub fn impl_type_args(&self) -> &[String] {
        &self.impl_type_args
    }

    /// `BINARY.<binary-path>` signature discipline.
    pub fn configure_binary(&mut self, binary_path: &str) {
        self.set_impl_type(ImplType::Binary);
        self.set_impl_signature(format!("BINARY.{binary_path}"));
        self.set_impl_type_args(vec![binary_path.to_string()]);
    }

    /// `MPI.<procs>.<binary>` signature discipline.
    pub fn configure_mpi(&mut self, binary_path: &str, procs: &ProcessCount, default_procs: u32) {
        self.set_impl_type(ImplType::Mpi);
        let procs_token = procs.to_signature_token(default_procs);
        self.set_impl_signature(format!("MPI.{procs_token}.{binary_path}"));
        self.set_impl_type_args(vec![procs_token, binary_path.to_string()]);
    }

    /// `OMPSS.<binary>` signature discipline.
    pub fn configure_ompss(&mut self, binary_path: &str) {
        self.set_impl_type(ImplType::OmpSs);
        self.set_impl_signature(format!("OMPSS.{binary_path}"));
        self.set_impl_type_args(vec![binary_path.to_string()]);
    }

    /// HTTP implementations carry no signature — type + args suffice.
    pub fn configure_http(&mut self, args: Vec<String>) {
        self.set_impl_type(ImplType::Http);
        self.impl_signature = None;
        self.set_impl_type_args(args);
    }

    /// `MPMDMPI.<processes_per_node>` signature, with the fixed ABI ordering
    /// of `impl_type_args`: runner, ppn, working_dir, fail_by_exit_value,
    /// program_count, then (binary, params, procs) per program.
    pub fn configure_mpmd_mpi(
        &mut self,
        runner: &str,
        processes_per_node: u32,
        working_dir: &str,
        fail_by_exit_value: bool,
        programs: &[MpmdProgram],
    ) {
        self.set_impl_type(ImplType::MpmdMpi);
        self.set_impl_signature(format!("MPMDMPI.{processes_per_node}"));

        let mut args = vec![
            runner.to_string(),
            processes_per_node.to_string(),
            working_dir.to_string(),
            fail_by_exit_value.to_string(),
            programs.len().to_string(),
        ];
        for program in programs {
            args.push(program.binary.clone());
            args.push(
                program
                    .params
                    .clone()
                    .unwrap_or_else(|| ABSENT_PARAM.to_string()),
            );
            args.push(
                program
                    .processes
                    .clone()
                    .unwrap_or_else(|| ABSENT_PARAM.to_string()),
            );
        }
        self.set_impl_type_args(args);
    }
}

/// Builder context threaded through a capability decorator stack.
///
/// Mirrors the "is there already a CE in kwargs?" probe of the original
/// binding: if the surrounding call already carries a core element, the
/// outer layer mutates it in place; otherwise it allocates one.
#[derive(Debug, Default)]
pub struct CoreElementBuilder {
    element: Option<CoreElement>,
}

impl CoreElementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the carried element, allocating a fresh one on first use.
    pub fn element_mut(&mut self) -> &mut CoreElement {
        self.element.get_or_insert_with(CoreElement::new)
    }

    /// Materialize the builder into its finished core element.
    pub fn build(self) -> Option<CoreElement> {
        self.element
    }
}

#[cfg(test)]
#[path = "core_element_tests.rs"]
mod tests;
