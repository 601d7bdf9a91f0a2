//! Configuration system for SymForge.
//!
//! Load compiler configuration from TOML or YAML files to control how
//! constraint text is parsed and how penalties are weighted without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use symforge_config::{CompilerConfig, ParseMode};
//!
//! let config = CompilerConfig::from_toml_str(r#"
//!     parse_mode = "strict"
//!     variables = ["spam", "eggs"]
//!     nvars = 2
//!
//!     [constants]
//!     limit = 42.0
//!
//!     [penalty]
//!     k = 1000.0
//! "#).unwrap();
//!
//! assert_eq!(config.parse_mode, ParseMode::Strict);
//! assert_eq!(config.penalty.k, 1000.0);
//! assert_eq!(config.penalty.h, 5.0);
//! assert_eq!(config.constants["limit"], 42.0);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use symforge_config::CompilerConfig;
//!
//! let config = CompilerConfig::load("symforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use symforge_core::VariableScheme;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main compiler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompilerConfig {
    /// How lines without a relational operator are handled.
    #[serde(default)]
    pub parse_mode: ParseMode,

    /// Variable naming scheme used by the constraint text.
    #[serde(default)]
    pub variables: VariableScheme,

    /// Declared dimensionality; inferred from the text when absent.
    #[serde(default)]
    pub nvars: Option<usize>,

    /// Named constants available to every compiled expression.
    #[serde(default)]
    pub constants: BTreeMap<String, f64>,

    /// Penalty multiplier configuration.
    #[serde(default)]
    pub penalty: PenaltyConfig,

    /// Compile pure-arithmetic conditions to native code.
    #[serde(default)]
    pub jit: bool,

    /// Build independent expressions on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::default(),
            variables: VariableScheme::default(),
            nvars: None,
            constants: BTreeMap::new(),
            penalty: PenaltyConfig::default(),
            jit: false,
            parallel: true,
        }
    }
}

impl CompilerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.penalty.k.is_finite() && self.penalty.k > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "penalty.k must be a positive finite number, got {}",
                self.penalty.k
            )));
        }
        if !(self.penalty.h.is_finite() && self.penalty.h > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "penalty.h must be a positive finite number, got {}",
                self.penalty.h
            )));
        }
        if let VariableScheme::Base(base) = &self.variables {
            if base.is_empty() {
                return Err(ConfigError::Invalid(
                    "variable base must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Sets the parse mode.
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    /// Sets the variable naming scheme.
    pub fn with_variables(mut self, variables: impl Into<VariableScheme>) -> Self {
        self.variables = variables.into();
        self
    }

    /// Sets the declared dimensionality.
    pub fn with_nvars(mut self, nvars: usize) -> Self {
        self.nvars = Some(nvars);
        self
    }

    /// Adds a named constant.
    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    /// Sets the penalty multiplier `k`.
    pub fn with_penalty_multiplier(mut self, k: f64) -> Self {
        self.penalty.k = k;
        self
    }

    /// Enables or disables native compilation of conditions.
    pub fn with_jit(mut self, jit: bool) -> Self {
        self.jit = jit;
        self
    }

    /// Enables or disables parallel builds.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Handling of constraint lines that contain none of `=`, `<`, `>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Report the line and leave it out of the compiled output.
    #[default]
    Permissive,

    /// Fail the whole compile.
    Strict,
}

/// Penalty weighting.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PenaltyConfig {
    /// Multiplier applied to every violation term.
    #[serde(default = "default_k")]
    pub k: f64,

    /// Factor applied to `k` on each escalation.
    #[serde(default = "default_h")]
    pub h: f64,
}

fn default_k() -> f64 {
    100.0
}

fn default_h() -> f64 {
    5.0
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            h: default_h(),
        }
    }
}

impl PenaltyConfig {
    /// Creates a penalty configuration.
    pub fn new(k: f64, h: f64) -> Self {
        Self { k, h }
    }
}
