//! Colorful console output for compiler events.
//!
//! Provides a custom `tracing` layer that formats the structured events
//! emitted while constraint text is normalized, built and composed.
//!
//! ## Log Levels
//!
//! - **INFO**: Build and composition summaries
//! - **WARN**: Constraint lines left out of the output, JIT failures
//! - **DEBUG**: Individual compiled functions and skipped repair steps

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crates whose events the layer formats. The `symforge` binary logs under
/// `symforge::`.
const TARGETS: [&str; 2] = ["symforge_symbolic", "symforge::"];

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default `info` level.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(CompilerConsoleLayer)
            .try_init();
    });
}

/// Prints the SymForge banner to stdout.
pub fn print_banner() {
    let banner = r#"
 ____                  _____
/ ___| _   _ _ __ ___ |  ___|__  _ __ __ _  ___
\___ \| | | | '_ ` _ \| |_ / _ \| '__/ _` |/ _ \
 ___) | |_| | | | | | |  _| (_) | | | (_| |  __/
|____/ \__, |_| |_| |_|_|  \___/|_|  \__, |\___|
       |___/                         |___/
"#;

    let version_line = format!("            v{} - Symbolic Constraint Compiler\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

// Returns elapsed time since init.
fn elapsed_secs() -> f64 {
    EPOCH.get().map_or(0.0, |epoch| epoch.elapsed().as_secs_f64())
}

/// A tracing layer that formats compiler events with colors.
///
/// Writes to stderr so that compiled output on stdout stays clean.
pub struct CompilerConsoleLayer;

impl<S: Subscriber> Layer<S> for CompilerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !is_formatted_target(target) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{} {}", format_elapsed(), output);
        }
    }
}

fn is_formatted_target(target: &str) -> bool {
    TARGETS.iter().any(|t| target.starts_with(t))
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    expression: Option<String>,
    text: Option<String>,
    kind: Option<String>,
    reason: Option<String>,
    error: Option<String>,
    variables: Option<String>,
    parse_mode: Option<String>,
    jit: Option<bool>,
    line: Option<u64>,
    inequalities: Option<u64>,
    equalities: Option<u64>,
    jitted: Option<u64>,
    ndim: Option<u64>,
    count: Option<u64>,
    terms: Option<u64>,
    steps: Option<u64>,
    k: Option<f64>,
    h: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "line" => self.line = Some(value),
            "inequalities" => self.inequalities = Some(value),
            "equalities" => self.equalities = Some(value),
            "jitted" => self.jitted = Some(value),
            "ndim" => self.ndim = Some(value),
            "count" => self.count = Some(value),
            "terms" => self.terms = Some(value),
            "steps" => self.steps = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "jit" {
            self.jit = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "k" => self.k = Some(value),
            "h" => self.h = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "message" => &mut self.message,
            "expression" => &mut self.expression,
            "text" => &mut self.text,
            "kind" => &mut self.kind,
            "reason" => &mut self.reason,
            "error" => &mut self.error,
            "variables" => &mut self.variables,
            "parse_mode" => &mut self.parse_mode,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "compiler_configured" => format_compiler_configured(v),
        "malformed_line" => format_malformed_line(v),
        "conditions_built" => format_conditions_built(v),
        "solvers_built" => format_solvers_built(v),
        "penalty_composed" => format_penalty_composed(v),
        "constraint_composed" => format_constraint_composed(v),
        "condition_compiled" | "solver_compiled" => format_compiled(v),
        "jit_skipped" | "jit_failed" | "solver_skipped" => format_skipped(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_compiler_configured(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Compiler │ variables {} │ {}",
        "⚙".bright_cyan().bold(),
        v.variables.as_deref().unwrap_or("").bright_yellow(),
        v.parse_mode.as_deref().unwrap_or("").to_lowercase().bright_blue(),
    );
    if v.jit == Some(true) {
        output.push_str(&format!(" │ {}", "native".bright_magenta().bold()));
    }
    output
}

fn format_malformed_line(v: &EventVisitor) -> String {
    format!(
        "{} Skipped line {} │ {}",
        "!".bright_yellow().bold(),
        v.line.unwrap_or(0).bright_yellow(),
        v.text.as_deref().unwrap_or("").white()
    )
}

fn format_conditions_built(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Conditions │ {} inequalities │ {} equalities",
        "■".bright_cyan().bold(),
        v.inequalities.unwrap_or(0).bright_yellow(),
        v.equalities.unwrap_or(0).bright_yellow(),
    );
    if let Some(jitted) = v.jitted.filter(|&n| n > 0) {
        output.push_str(&format!(" │ {} native", jitted.bright_magenta().bold()));
    }
    push_ndim(&mut output, v);
    output
}

fn format_solvers_built(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Solvers │ {} assignments",
        "■".bright_cyan().bold(),
        v.count.unwrap_or(0).bright_yellow(),
    );
    push_ndim(&mut output, v);
    output
}

fn push_ndim(output: &mut String, v: &EventVisitor) {
    if let Some(ndim) = v.ndim {
        output.push_str(&format!(" │ {} variables", ndim.bright_yellow()));
    }
}

fn format_penalty_composed(v: &EventVisitor) -> String {
    format!(
        "{} Penalty │ {} terms │ k = {} │ h = {}",
        "▶".bright_green().bold(),
        v.terms.unwrap_or(0).bright_yellow(),
        format_number(v.k).bright_magenta(),
        format_number(v.h).bright_magenta(),
    )
}

fn format_constraint_composed(v: &EventVisitor) -> String {
    format!(
        "{} Constraint │ {} steps",
        "▶".bright_green().bold(),
        v.steps.unwrap_or(0).bright_yellow(),
    )
}

fn format_compiled(v: &EventVisitor) -> String {
    let expression = v.expression.as_deref().unwrap_or("");
    match v.kind.as_deref() {
        Some(kind) => format!(
            "{} {} │ {}",
            "✓".bright_green(),
            kind.bright_blue(),
            expression.white()
        ),
        None => format!("{} {}", "✓".bright_green(), expression.white()),
    }
}

fn format_skipped(v: &EventVisitor, level: Level) -> String {
    let icon = if level == Level::WARN {
        "✗".bright_red().to_string()
    } else {
        "✗".bright_black().to_string()
    };
    let cause = v.reason.as_deref().or(v.error.as_deref()).unwrap_or("");
    format!(
        "{} {} │ {} │ {}",
        icon,
        v.event.as_deref().unwrap_or("").replace('_', " "),
        v.expression.as_deref().unwrap_or("").white(),
        cause.bright_black()
    )
}

fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => "N/A".to_string(),
    }
}
