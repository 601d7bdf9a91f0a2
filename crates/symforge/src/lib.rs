//! SymForge - Symbolic Constraints in Rust
//!
//! Write constraints as text, get back a penalty function and a repair
//! function over `&[f64]` points.
//!
//! # Example
//!
//! ```rust
//! use symforge::prelude::*;
//!
//! let compiler = SymbolicCompiler::new(CompilerConfig::default().with_nvars(3));
//! let text = "x2 = x0/2.\nx0 >= 0.";
//!
//! let penalty = compiler.penalty(text, &Kinds::Default).unwrap();
//! assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.5]), 0.0);
//!
//! let constraint = compiler.constraint(text, &Kinds::Default).unwrap();
//! assert_eq!(constraint.apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, 0.0]);
//! ```

// Configuration
pub use symforge_config::{CompilerConfig, ConfigError, ParseMode, PenaltyConfig};

// Shared types and aggregate measures
pub use symforge_core::{measures, ConditionKind, MeasureError, Relation, VariableScheme};

// Text transforms
pub use symforge_symbolic::{
    get_variables, linear_symbolic, replace_variables, to_penalty_form, to_solver_form,
    LinearRows, MalformedLine, ParsedConstraint, PenaltyForm, SolverForm,
};

// Function builders and composers
pub use symforge_symbolic::{
    build_conditions, build_solvers, compose_constraint, compose_penalty, Condition, Conditions,
    ConstraintFunction, CouplingKind, Kinds, PenaltyFunction, PenaltyKind, Solver,
    SymbolicCompiler, SymbolicError,
};

// Expression layer
pub use symforge_symbolic::{
    eval_expr, jit, parse_expr, parse_statement, Environment, EvalContext, Expr, Function,
    Statement, Value,
};

/// Colored console output for compiler events.
#[cfg(feature = "console")]
pub use symforge_console as console;

pub mod prelude {
    pub use super::{CompilerConfig, ParseMode, PenaltyConfig, VariableScheme};
    pub use super::{
        ConstraintFunction, CouplingKind, Kinds, PenaltyFunction, PenaltyKind, SymbolicCompiler,
        SymbolicError,
    };
    pub use super::{get_variables, linear_symbolic, replace_variables};
}
