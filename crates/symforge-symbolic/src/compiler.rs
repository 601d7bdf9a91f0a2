//! One-stop compiler wiring configuration to the build and compose stages.

use symforge_config::CompilerConfig;

use crate::build::{build_conditions, build_solvers, Conditions, Solver};
use crate::compose::{
    compose_constraint, compose_penalty, ConstraintFunction, CouplingKind, Kinds,
    PenaltyFunction, PenaltyKind,
};
use crate::error::Result;
use crate::extract::get_variables;
use crate::normalize::{to_penalty_form, to_solver_form, PenaltyForm, SolverForm};

/// Compiles constraint text under a fixed configuration.
///
/// # Example
///
/// ```
/// use symforge_config::CompilerConfig;
/// use symforge_symbolic::{Kinds, SymbolicCompiler};
///
/// let compiler = SymbolicCompiler::new(CompilerConfig::default().with_nvars(3));
/// let text = "x2 = x0/2.\nx0 >= 0.";
///
/// let penalty = compiler.penalty(text, &Kinds::Default).unwrap();
/// assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 25.0);
///
/// let constraint = compiler.constraint(text, &Kinds::Default).unwrap();
/// assert_eq!(constraint.apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, 0.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolicCompiler {
    config: CompilerConfig,
}

impl SymbolicCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Variables referenced by `text` under the configured scheme.
    pub fn variables(&self, text: &str) -> Vec<String> {
        get_variables(text, &self.config.variables)
    }

    /// Normalized penalty form; malformed lines are handled per `parse_mode`.
    pub fn penalty_form(&self, text: &str) -> Result<PenaltyForm> {
        to_penalty_form(text, &self.config.variables, self.config.nvars)
            .enforce(self.config.parse_mode)
    }

    /// Normalized solver form; malformed lines are handled per `parse_mode`.
    pub fn solver_form(&self, text: &str) -> Result<SolverForm> {
        to_solver_form(text, &self.config.variables, self.config.nvars)
            .enforce(self.config.parse_mode)
    }

    pub fn conditions(&self, text: &str) -> Result<Conditions> {
        build_conditions(text, &self.config)
    }

    pub fn solvers(&self, text: &str) -> Result<Vec<Solver>> {
        build_solvers(text, &self.config)
    }

    /// Builds the conditions of `text` and composes them into a penalty
    /// weighted by the configured `k` and `h`.
    pub fn penalty(&self, text: &str, kinds: &Kinds<PenaltyKind>) -> Result<PenaltyFunction> {
        let conditions = self.conditions(text)?.into_vec();
        compose_penalty(&conditions, kinds, &self.config.penalty)
    }

    /// Builds the solvers of `text` and composes them into a repair function.
    pub fn constraint(
        &self,
        text: &str,
        kinds: &Kinds<CouplingKind>,
    ) -> Result<ConstraintFunction> {
        let solvers = self.solvers(text)?;
        compose_constraint(&solvers, kinds)
    }
}

impl From<CompilerConfig> for SymbolicCompiler {
    fn from(config: CompilerConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use symforge_config::{ParseMode, PenaltyConfig, VariableScheme};

    use super::*;
    use crate::error::SymbolicError;

    #[test]
    fn test_configured_multiplier() {
        let mut config = CompilerConfig::default().with_nvars(3);
        config.penalty = PenaltyConfig::new(10.0, 2.0);
        let compiler = SymbolicCompiler::new(config);

        let penalty = compiler.penalty("x2 = x0/2.\nx0 >= 0.", &Kinds::Default).unwrap();
        assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 2.5);
        assert_eq!(penalty.escalate().evaluate(&[1.0, 2.0, 0.0]), 5.0);
    }

    #[test]
    fn test_strict_mode_reaches_every_stage() {
        let compiler =
            SymbolicCompiler::new(CompilerConfig::default().with_parse_mode(ParseMode::Strict));
        let text = "x0 >= 0.\nx1 + 2";

        for result in [
            compiler.penalty_form(text).err(),
            compiler.solver_form(text).err(),
            compiler.penalty(text, &Kinds::Default).err(),
            compiler.constraint(text, &Kinds::Default).err(),
        ] {
            assert_eq!(
                result,
                Some(SymbolicError::MalformedConstraint {
                    line: 2,
                    text: "x[1] + 2".to_string()
                })
            );
        }
    }

    #[test]
    fn test_named_variables() {
        let compiler = SymbolicCompiler::new(
            CompilerConfig::default().with_variables(VariableScheme::names(["spam", "eggs"])),
        );
        let text = "spam >= eggs + 1";
        assert_eq!(compiler.variables(text), ["spam", "eggs"]);

        let constraint = compiler.constraint(text, &Kinds::Default).unwrap();
        assert_eq!(constraint.apply(&[0.0, 1.0]), vec![2.0, 1.0]);
        assert_eq!(constraint.apply(&[3.0, 1.0]), vec![3.0, 1.0]);
    }
}
