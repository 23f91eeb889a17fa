// dashdiff - compare generated dashboard artifacts between two folders

mod exit_codes;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use dashdiff_cli::render::{render_json, render_text};
use dashdiff_cli::settings::{self, Overrides, SettingsError};
use dashdiff_cli::compare_folders;
use dashdiff_recon::{DuplicatePolicy, Side, Verdict};

use exit_codes::{EXIT_DIFFERENCES, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "dashdiff")]
#[command(about = "Compare generated dashboard files between two folders")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Examples:
  dashdiff testing/                     # compares against ../output
  dashdiff testing/ output/ --json
  dashdiff testing/ output/ --fields goal,data --tolerance 0.5
  dashdiff testing/ output/ --on-duplicate reject -o report.json

Exit codes:
  0  all files match
  1  differences found
  2  usage or configuration error
  3  report could not be written")]
struct Cli {
    /// Folder holding the reference dashboard files
    left: String,

    /// Folder to compare against [default: `output` next to LEFT]
    right: Option<String>,

    /// TOML config file (flags below override its values)
    #[arg(long, short = 'c', env = "DASHDIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Fields to compare, comma-separated
    #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
    fields: Option<Vec<String>>,

    /// Field that names each record
    #[arg(long, value_name = "NAME")]
    key_field: Option<String>,

    /// Absolute tolerance for float fields
    #[arg(long, value_name = "F")]
    tolerance: Option<f64>,

    /// What to do when a name appears twice in one file
    #[arg(long, value_enum)]
    on_duplicate: Option<OnDuplicate>,

    /// Print the JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Also write the JSON report to this file
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only log errors on stderr
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnDuplicate {
    LastWins,
    FirstWins,
    Reject,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(value: OnDuplicate) -> Self {
        match value {
            OnDuplicate::LastWins => DuplicatePolicy::LastWins,
            OnDuplicate::FirstWins => DuplicatePolicy::FirstWins,
            OnDuplicate::Reject => DuplicatePolicy::Reject,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("DASHDIFF_REVISION"), ")",
        "\nengine:  dashdiff-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("DASHDIFF_TARGET"),
        "\nreport_version(json): 1",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match cmd_compare(cli) {
        Ok(Verdict::Clean) => ExitCode::from(EXIT_SUCCESS),
        Ok(Verdict::Dirty) => ExitCode::from(EXIT_DIFFERENCES),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

// ============================================================================
// compare
// ============================================================================

fn cmd_compare(cli: Cli) -> Result<Verdict, CliError> {
    let overrides = Overrides {
        key_field: cli.key_field,
        fields: cli.fields,
        tolerance: cli.tolerance,
        on_duplicate: cli.on_duplicate.map(DuplicatePolicy::from),
    };
    let config = settings::load_config(cli.config.as_deref(), &overrides).map_err(CliError::settings)?;

    let left = settings::resolve_folder(&cli.left, Side::Left).map_err(CliError::settings)?;
    let right = match cli.right {
        Some(ref raw) => settings::resolve_folder(raw, Side::Right).map_err(CliError::settings)?,
        None => settings::check_folder(&settings::default_right_folder(&left), Side::Right)
            .map_err(|e| CliError::settings(e).with_hint("pass the right folder as the second argument"))?,
    };
    log::debug!("comparing {} against {}", left.display(), right.display());

    let report = compare_folders(&left, &right, &config).map_err(|e| CliError::args(e.to_string()))?;

    if let Some(ref path) = cli.output {
        let json = render_json(&report).map_err(|e| CliError::output(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
    }

    let body = if cli.json {
        render_json(&report).map_err(|e| CliError::output(e.to_string()))?
    } else {
        render_text(&report)
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(body.as_bytes())
        .and_then(|()| handle.flush())
        .map_err(|e| CliError::output(e.to_string()))?;

    Ok(report.verdict)
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Settings errors are all usage errors; a few get a hint.
    pub fn settings(err: SettingsError) -> Self {
        let hint = match &err {
            SettingsError::Config(_) => Some("check the config file and --fields/--key-field/--tolerance".to_string()),
            SettingsError::Read { .. } => Some("--config (or DASHDIFF_CONFIG) must name a readable TOML file".to_string()),
            _ => None,
        };
        Self { code: EXIT_USAGE, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
