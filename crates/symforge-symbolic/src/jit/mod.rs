//! JIT compilation of scalar conditions to native machine code via Cranelift.
//!
//! Conditions built only from literals, `x[i]`, `+ - * /`, negation and the
//! `abs sqrt floor ceil round min max` functions are compiled into
//! `fn(*const f64) -> f64`, skipping the tree-walking interpreter. Anything
//! else is reported as `JitError::Unsupported` and stays interpreted.

#[cfg(test)]
mod tests;

mod compiler;

pub use compiler::{compile, is_compilable, JitError, JitFn};
