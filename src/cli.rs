//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_trade_source::JsonTradeSource;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::comparator::{Comparator, DEFAULT_NOTIONAL_TOLERANCE};
use crate::domain::config_validation::{
    parse_tolerance, validate_reconcile_config, validate_with_format_override,
};
use crate::domain::error::ReconError;
use crate::domain::format::ExternalFormat;
use crate::domain::parse_result::ParsedTrades;
use crate::ports::config_port::ConfigPort;
use crate::reconciliation::{parser_for, ReconciliationEngine, ReconciliationResult};

pub const DEFAULT_REPORT_PATH: &str = "reconciliation-report.txt";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "tradematch", about = "Reconcile internal trades against external confirmations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile internal trades against an external file
    Reconcile {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON file of authoritative trades
        #[arg(short, long)]
        internal: Option<PathBuf>,
        #[arg(short, long)]
        external: Option<PathBuf>,
        /// tabular (csv) or interchange (swift, mt)
        #[arg(short, long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip writing the report file
        #[arg(long)]
        no_report: bool,
    },
    /// Print the normalized trades of an external file as JSON
    Parse {
        external: PathBuf,
        #[arg(short, long, default_value = "tabular")]
        format: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOverrides {
    pub internal: Option<PathBuf>,
    pub external: Option<PathBuf>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub no_report: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileSettings {
    pub internal: PathBuf,
    pub external: PathBuf,
    pub format: ExternalFormat,
    pub output: PathBuf,
    pub tolerance: Decimal,
    pub write_report: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Reconcile {
            config,
            internal,
            external,
            format,
            output,
            no_report,
        } => run_reconcile(
            config.as_deref(),
            ReconcileOverrides {
                internal,
                external,
                format,
                output,
                no_report,
            },
        ),
        Command::Parse { external, format } => run_parse(&external, &format),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: Option<&str>) {
    let level = level.map(str::trim).unwrap_or(DEFAULT_LOG_LEVEL).to_lowercase();
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Merges command-line overrides over config values.
///
/// The input paths must come from one or the other; format defaults to
/// tabular, the report path to [`DEFAULT_REPORT_PATH`] and the tolerance
/// to 0.01.
pub fn build_settings(
    config: Option<&dyn ConfigPort>,
    overrides: &ReconcileOverrides,
) -> Result<ReconcileSettings, ReconError> {
    let from_config =
        |section: &str, key: &str| config.and_then(|c| c.get_string(section, key));

    let internal = overrides
        .internal
        .clone()
        .or_else(|| from_config("internal", "trades_file").map(PathBuf::from))
        .ok_or_else(|| ReconError::ConfigMissing {
            section: "internal".into(),
            key: "trades_file".into(),
        })?;
    let external = overrides
        .external
        .clone()
        .or_else(|| from_config("external", "file").map(PathBuf::from))
        .ok_or_else(|| ReconError::ConfigMissing {
            section: "external".into(),
            key: "file".into(),
        })?;

    let format = match overrides.format.clone().or_else(|| from_config("external", "format")) {
        Some(f) => f.parse()?,
        None => ExternalFormat::Tabular,
    };

    let output = overrides
        .output
        .clone()
        .or_else(|| from_config("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    let tolerance = match config {
        Some(c) => parse_tolerance(c)?.unwrap_or(DEFAULT_NOTIONAL_TOLERANCE),
        None => DEFAULT_NOTIONAL_TOLERANCE,
    };

    let write_report =
        !overrides.no_report && config.is_none_or(|c| c.get_bool("report", "write", true));

    Ok(ReconcileSettings {
        internal,
        external,
        format,
        output,
        tolerance,
        write_report,
    })
}

/// Exit status of a run that completed and found discrepancies.
pub const EXIT_DISCREPANCIES: u8 = 1;

impl ReconcileSettings {
    pub fn engine(&self) -> ReconciliationEngine {
        ReconciliationEngine::new(Comparator::new(self.tolerance))
    }
}

/// Loads the authoritative trades and reconciles them; no report is written.
pub fn execute_reconcile(
    engine: &ReconciliationEngine,
    settings: &ReconcileSettings,
) -> Result<ReconciliationResult, ReconError> {
    let source = JsonTradeSource::new(&settings.internal);
    engine.reconcile_from_source(&source, &settings.external, settings.format.as_str())
}

fn run_reconcile(config_path: Option<&Path>, overrides: ReconcileOverrides) -> ExitCode {
    ExitCode::from(reconcile_status(config_path, &overrides))
}

/// Runs the `reconcile` command and returns its exit status: 0 when clean,
/// [`EXIT_DISCREPANCIES`] when discrepancies were found, otherwise the
/// error's [`ReconError::exit_status`].
pub fn reconcile_status(config_path: Option<&Path>, overrides: &ReconcileOverrides) -> u8 {
    match reconcile_and_report(config_path, overrides) {
        Ok(result) if result.is_clean() => 0,
        Ok(_) => EXIT_DISCREPANCIES,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_status()
        }
    }
}

fn reconcile_and_report(
    config_path: Option<&Path>,
    overrides: &ReconcileOverrides,
) -> Result<ReconciliationResult, ReconError> {
    let config = config_path.map(FileConfigAdapter::from_file).transpose()?;
    let config_port = config.as_ref().map(|c| c as &dyn ConfigPort);

    init_logging(config_port.and_then(|c| c.get_string("logging", "level")).as_deref());

    if let Some(c) = config_port {
        validate_with_format_override(c, overrides.format.is_some())?;
    }
    let settings = build_settings(config_port, overrides)?;

    eprintln!(
        "Reconciling {} against {} ({})",
        settings.internal.display(),
        settings.external.display(),
        settings.format
    );
    let engine = settings.engine();
    let result = execute_reconcile(&engine, &settings)?;
    print_summary(&result);

    if settings.write_report {
        let path = engine.generate_report(&result, &settings.output, &TextReportAdapter::new())?;
        eprintln!("Report saved to {}", path.display());
    }
    Ok(result)
}

fn print_summary(result: &ReconciliationResult) {
    eprintln!("\n=== Reconciliation Summary ===");
    eprintln!("Internal Trades:  {}", result.left_count);
    eprintln!("External Trades:  {}", result.right_count);
    eprintln!("Matched:          {}", result.matched);
    eprintln!("Clean Matches:    {}", result.clean_matches);
    eprintln!("Discrepancies:    {}", result.discrepancies.len());
    if !result.warnings.is_empty() {
        eprintln!("\nParse warnings ({}):", result.warnings.len());
        for w in &result.warnings {
            eprintln!("  {w}");
        }
    }
    for dup in &result.duplicate_keys {
        eprintln!("  duplicate key {} on {:?} side, later record kept", dup.key, dup.side);
    }
}

/// Parses one external file with the parser for `format`.
pub fn parse_external(path: &Path, format: &str) -> Result<ParsedTrades, ReconError> {
    let format: ExternalFormat = format.parse()?;
    parser_for(format)?.parse_file(path)
}

fn run_parse(path: &Path, format: &str) -> ExitCode {
    init_logging(None);
    let parsed = match parse_external(path, format) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    for w in &parsed.warnings {
        eprintln!("warning: {w}");
    }
    match serde_json::to_string_pretty(&parsed.records) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(70)
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_reconcile_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = build_settings(Some(&config), &ReconcileOverrides::default()) {
        eprintln!("warning: {e} (must be given on the command line)");
    }
    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}
