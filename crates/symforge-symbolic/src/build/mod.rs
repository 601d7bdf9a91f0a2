//! Condition and solver function builders.
//!
//! Builds are independent per expression and share only the immutable
//! `Environment`, so with `parallel` enabled they run on the rayon pool.
//! Output order always matches declaration order.

mod condition;
mod solver;


pub use condition::{Condition, Conditions};
pub use solver::Solver;

use rayon::prelude::*;
use symforge_config::CompilerConfig;
use symforge_core::{ConditionKind, VariableScheme};
use tracing::info;

use crate::env::Environment;
use crate::error::Result;
use crate::normalize::{to_penalty_form, to_solver_form};

/// Compiles constraint text into condition functions.
///
/// # Example
///
/// ```
/// use symforge_config::CompilerConfig;
/// use symforge_symbolic::build_conditions;
///
/// let config = CompilerConfig::default().with_nvars(3);
/// let conditions = build_conditions("x2 = x0/2.\nx0 >= 0.", &config).unwrap();
///
/// assert_eq!(conditions.inequalities[0].text(), "-(x[0] - (0.))");
/// assert_eq!(conditions.equalities[0].evaluate(&[1.0, 2.0, 0.5]), 0.0);
/// ```
pub fn build_conditions(text: &str, config: &CompilerConfig) -> Result<Conditions> {
    let form = to_penalty_form(text, &config.variables, config.nvars).enforce(config.parse_mode)?;
    let env = Environment::from_config(config);
    let bound = declared_dimension(config);

    let compile = |(text, kind): &(String, ConditionKind)| -> Result<Condition> {
        let condition = Condition::compile(text, *kind, &env, bound)?;
        Ok(if config.jit { condition.with_jit() } else { condition })
    };
    let tagged = |texts: Vec<String>, kind: ConditionKind| -> Vec<(String, ConditionKind)> {
        texts.into_iter().map(|t| (t, kind)).collect()
    };

    let conditions = Conditions {
        inequalities: compile_all(
            &tagged(form.inequalities, ConditionKind::Inequality),
            config.parallel,
            compile,
        )?,
        equalities: compile_all(
            &tagged(form.equalities, ConditionKind::Equality),
            config.parallel,
            compile,
        )?,
    };

    info!(
        event = "conditions_built",
        inequalities = conditions.inequalities.len(),
        equalities = conditions.equalities.len(),
        jitted = conditions.iter().filter(|c| c.is_jitted()).count(),
        ndim = form.ndim,
    );
    Ok(conditions)
}

/// Compiles constraint text into solver functions, in declaration order.
///
/// # Example
///
/// ```
/// use symforge_config::CompilerConfig;
/// use symforge_symbolic::build_solvers;
///
/// let config = CompilerConfig::default().with_nvars(3);
/// let solvers = build_solvers("x2 = x0/2.\nx0 >= 0.", &config).unwrap();
///
/// assert_eq!(solvers[1].text(), "x[0] = max(0., x[0])");
/// assert_eq!(solvers[1].apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, -3.0]);
/// ```
pub fn build_solvers(text: &str, config: &CompilerConfig) -> Result<Vec<Solver>> {
    let form = to_solver_form(text, &config.variables, config.nvars).enforce(config.parse_mode)?;
    let env = Environment::from_config(config);
    let bound = declared_dimension(config);

    let solvers = compile_all(&form.statements, config.parallel, |text: &String| {
        Solver::compile(text, &env, bound)
    })?;

    info!(event = "solvers_built", count = solvers.len(), ndim = form.ndim);
    Ok(solvers)
}

/// The dimensionality fixed by the configuration, if any.
///
/// Only a declared dimension bounds `x[i]` at build time; an inferred one
/// cannot, since the text may index the point directly.
pub(crate) fn declared_dimension(config: &CompilerConfig) -> Option<usize> {
    match (&config.variables, config.nvars) {
        (_, Some(n)) => Some(n),
        (VariableScheme::Names(names), None) => Some(names.len()),
        (VariableScheme::Base(_), None) => None,
    }
}

fn compile_all<S, T, F>(sources: &[S], parallel: bool, compile: F) -> Result<Vec<T>>
where
    S: Sync,
    T: Send,
    F: Fn(&S) -> Result<T> + Sync + Send,
{
    if parallel {
        sources.par_iter().map(&compile).collect()
    } else {
        sources.iter().map(compile).collect()
    }
}
