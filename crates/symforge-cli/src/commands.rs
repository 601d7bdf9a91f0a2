//! Command implementations
//!
//! Each command writes its result to `out`, one item per line.

use std::io::{Read, Write};
use std::path::Path;

use clap::ValueEnum;
use symforge_config::{CompilerConfig, ParseMode, VariableScheme};
use symforge_symbolic::{CouplingKind, Kinds, PenaltyKind, SymbolicCompiler};
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::Cli;

/// Penalty kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum PenaltyArg {
    LinearEquality,
    QuadraticEquality,
    UniformEquality,
    LinearInequality,
    QuadraticInequality,
    UniformInequality,
    BarrierInequality,
}

impl From<PenaltyArg> for PenaltyKind {
    fn from(arg: PenaltyArg) -> Self {
        match arg {
            PenaltyArg::LinearEquality => PenaltyKind::LinearEquality,
            PenaltyArg::QuadraticEquality => PenaltyKind::QuadraticEquality,
            PenaltyArg::UniformEquality => PenaltyKind::UniformEquality,
            PenaltyArg::LinearInequality => PenaltyKind::LinearInequality,
            PenaltyArg::QuadraticInequality => PenaltyKind::QuadraticInequality,
            PenaltyArg::UniformInequality => PenaltyKind::UniformInequality,
            PenaltyArg::BarrierInequality => PenaltyKind::BarrierInequality,
        }
    }
}

/// Coupling kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CouplingArg {
    Inner,
    Outer,
}

impl From<CouplingArg> for CouplingKind {
    fn from(arg: CouplingArg) -> Self {
        match arg {
            CouplingArg::Inner => CouplingKind::Inner,
            CouplingArg::Outer => CouplingKind::Outer,
        }
    }
}

/// Builds the compiler from the config file, then applies flag overrides.
pub fn compiler(cli: &Cli) -> CliResult<SymbolicCompiler> {
    let mut config = match &cli.config {
        Some(path) if is_yaml(path) => CompilerConfig::from_yaml_file(path)?,
        Some(path) => CompilerConfig::from_toml_file(path)?,
        None => CompilerConfig::default(),
    };
    if let Some(names) = &cli.variables {
        config.variables = VariableScheme::names(names.iter().cloned());
    }
    if let Some(nvars) = cli.nvars {
        config.nvars = Some(nvars);
    }
    if cli.strict {
        config.parse_mode = ParseMode::Strict;
    }
    if cli.jit {
        config.jit = true;
    }
    debug!(
        event = "compiler_configured",
        variables = %config.variables,
        parse_mode = ?config.parse_mode,
        jit = config.jit,
        "compiler configured"
    );
    Ok(SymbolicCompiler::new(config))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Reads constraint text from `path`, or stdin for `None` and `-`.
pub fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CliError::Input {
                path: path.display().to_string(),
                source,
            })
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Input {
                    path: "stdin".to_string(),
                    source,
                })?;
            Ok(text)
        }
    }
}

/// No flag means the default kinds, one flag applies to every entry.
fn kinds<A: Copy + Into<K>, K: Copy>(args: &[A]) -> Kinds<K> {
    match args {
        [] => Kinds::Default,
        [one] => Kinds::all((*one).into()),
        many => Kinds::each(many.iter().map(|&a| a.into())),
    }
}

pub fn variables(compiler: &SymbolicCompiler, text: &str, out: &mut impl Write) -> CliResult<()> {
    for name in compiler.variables(text) {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn penalty_form(compiler: &SymbolicCompiler, text: &str, out: &mut impl Write) -> CliResult<()> {
    let form = compiler.penalty_form(text)?;
    for expression in &form.inequalities {
        writeln!(out, "inequality: {expression}")?;
    }
    for expression in &form.equalities {
        writeln!(out, "equality: {expression}")?;
    }
    Ok(())
}

pub fn solver_form(compiler: &SymbolicCompiler, text: &str, out: &mut impl Write) -> CliResult<()> {
    for statement in compiler.solver_form(text)?.statements {
        writeln!(out, "{statement}")?;
    }
    Ok(())
}

pub fn penalty(
    compiler: &SymbolicCompiler,
    text: &str,
    point: &[f64],
    args: &[PenaltyArg],
    describe: bool,
    out: &mut impl Write,
) -> CliResult<()> {
    let penalty = compiler.penalty(text, &kinds(args))?;
    if describe && !penalty.is_empty() {
        writeln!(out, "{penalty}")?;
    }
    writeln!(out, "{:?}", penalty.evaluate(point))?;
    Ok(())
}

pub fn repair(
    compiler: &SymbolicCompiler,
    text: &str,
    point: &[f64],
    args: &[CouplingArg],
    describe: bool,
    out: &mut impl Write,
) -> CliResult<()> {
    let constraint = compiler.constraint(text, &kinds(args))?;
    if describe && !constraint.is_empty() {
        writeln!(out, "{constraint}")?;
    }
    writeln!(out, "{:?}", constraint.apply(point))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "x2 = x0/2.\nx0 >= 0.";

    fn nvars3() -> SymbolicCompiler {
        SymbolicCompiler::new(CompilerConfig::default().with_nvars(3))
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> CliResult<()>) -> String {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_variables() {
        let text = "x1 + x2 = x3*4\nx3 = x2*x4";
        let listed = output(|out| variables(&SymbolicCompiler::default(), text, out));
        assert_eq!(listed, "x1\nx2\nx3\nx4\n");
    }

    #[test]
    fn test_penalty_form() {
        let printed = output(|out| penalty_form(&nvars3(), TEXT, out));
        assert_eq!(
            printed,
            "inequality: -(x[0] - (0.))\nequality: x[2] - (x[0]/2.)\n"
        );
    }

    #[test]
    fn test_solver_form() {
        let printed = output(|out| solver_form(&nvars3(), TEXT, out));
        assert_eq!(printed, "x[2] = x[0]/2.\nx[0] = max(0., x[0])\n");
    }

    #[test]
    fn test_penalty_value() {
        let printed = output(|out| penalty(&nvars3(), TEXT, &[1.0, 2.0, 0.0], &[], false, out));
        assert_eq!(printed, "25.0\n");

        let printed = output(|out| {
            penalty(
                &nvars3(),
                TEXT,
                &[1.0, 2.0, 0.0],
                &[PenaltyArg::LinearInequality, PenaltyArg::LinearEquality],
                true,
                out,
            )
        });
        assert_eq!(
            printed,
            "linear_inequality: -(x[0] - (0.))\nlinear_equality: x[2] - (x[0]/2.)\n50.0\n"
        );
    }

    #[test]
    fn test_repair() {
        let printed = output(|out| repair(&nvars3(), TEXT, &[-1.0, 2.0, -3.0], &[], false, out));
        assert_eq!(printed, "[0.0, 2.0, 0.0]\n");
    }

    #[test]
    fn test_kind_count_mismatch_is_an_error() {
        let mut out = Vec::new();
        let err = penalty(
            &nvars3(),
            TEXT,
            &[0.0; 3],
            &[PenaltyArg::LinearEquality; 3],
            false,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Compile(_)));
    }

    #[test]
    fn test_yaml_detection() {
        assert!(is_yaml(Path::new("symforge.yaml")));
        assert!(is_yaml(Path::new("conf/symforge.yml")));
        assert!(!is_yaml(Path::new("symforge.toml")));
    }
}
