//! Symbolic constraint compiler for SymForge.
//!
//! Turns human-readable constraint text such as
//!
//! ```text
//! x2 = x0/2.
//! x0 >= 0.
//! ```
//!
//! into two kinds of callable objects over a point `x: &[f64]`:
//!
//! - a **penalty function**, zero when every constraint holds and positive
//!   otherwise, built from condition functions
//!   ([`build_conditions`] then [`compose_penalty`]);
//! - a **constraint function** that repairs a point so the constraints hold,
//!   built from solver functions ([`build_solvers`] then
//!   [`compose_constraint`]).
//!
//! Text is first normalized ([`to_penalty_form`], [`to_solver_form`]), then
//! parsed into an [`Expr`] tree and evaluated by a tree-walking interpreter.
//! Pure-arithmetic conditions can optionally be compiled to native code
//! (see [`jit`]).

mod build;
mod compiler;
mod compose;
mod env;
mod error;
mod eval;
mod expr;
mod extract;
pub mod jit;
mod linear;
mod normalize;
mod parse;
mod rename;
mod scan;

pub use build::{build_conditions, build_solvers, Condition, Conditions, Solver};
pub use compiler::SymbolicCompiler;
pub use compose::{
    compose_constraint, compose_penalty, ConstraintFunction, ConstraintStep, CouplingKind, Kinds,
    PenaltyFunction, PenaltyKind, PenaltyStep,
};
pub use env::Environment;
pub use error::{Result, SymbolicError};
pub use eval::{apply_statement, eval_expr, EvalContext, Value};
pub use expr::{Arity, Expr, Function, Shape, Statement, Target};
pub use extract::get_variables;
pub use linear::{linear_symbolic, LinearRows};
pub use normalize::{
    to_penalty_form, to_solver_form, MalformedLine, ParsedConstraint, PenaltyForm, SolverForm,
};
pub use parse::{parse_expr, parse_statement, POINT};
pub use rename::{replace_variables, DEFAULT_MARKER};
