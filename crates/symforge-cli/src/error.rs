//! CLI error type

use symforge_config::ConfigError;
use symforge_symbolic::SymbolicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] SymbolicError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
