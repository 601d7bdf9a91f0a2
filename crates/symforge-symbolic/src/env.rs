//! Execution environment for compiled expressions.

use std::collections::BTreeMap;
use std::f64::consts;

use symforge_config::CompilerConfig;

/// Named constants visible to compiled expressions.
///
/// Caller constants shadow the built-in `pi`, `e`, `tau`, `inf` and `nan`.
/// Constants are folded into the expression tree at build time, so a
/// compiled function never looks anything up while it runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    constants: BTreeMap<String, f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment holding the constants of `config`.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            constants: config.constants.clone(),
        }
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied().or_else(|| builtin(name))
    }

    /// Caller-supplied constants, excluding built-ins.
    pub fn constants(&self) -> &BTreeMap<String, f64> {
        &self.constants
    }
}

fn builtin(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(consts::PI),
        "e" => Some(consts::E),
        "tau" => Some(consts::TAU),
        "inf" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}
