//! Selecta CLI - check form manifests and replay interaction scripts.

#![allow(
    clippy::needless_pass_by_value,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

mod script;

use clap::{ArgAction, Parser, Subcommand};
use selecta_core::{Constraints, Rect, Widget};
use selecta_widgets::{FormContainer, SubmitOutcome};
use selecta_yaml::{FormManifest, ParseError};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "selecta")]
#[command(about = "Check select-form manifests and replay interaction scripts")]
#[command(version)]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a form manifest
    Check {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Build a form, replay a script against it and print the final state
    Simulate {
        /// Manifest file (default: built-in Maslow form)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// YAML list of steps
        script: PathBuf,
    },
}

/// Errors surfaced by the CLI.
#[derive(Debug)]
pub(crate) enum CliError {
    /// File could not be read
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// Manifest failed to parse or validate
    Manifest(ParseError),
    /// Script failed to parse
    Script(serde_yaml_ng::Error),
    /// Script step aimed at something the form does not have
    Target(String),
    /// Final state could not be encoded
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Manifest(e) => write!(f, "manifest: {e}"),
            Self::Script(e) => write!(f, "script: {e}"),
            Self::Target(msg) => write!(f, "script target: {msg}"),
            Self::Json(e) => write!(f, "encoding state: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Manifest(e) => Some(e),
            Self::Script(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Target(_) => None,
        }
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        Self::Manifest(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Check { manifest } => check(&manifest),
        Commands::Simulate { manifest, script } => simulate(manifest.as_deref(), &script),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

const fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = level_filter(verbose, quiet);
    // An already-installed logger wins.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_manifest(path: Option<&Path>) -> Result<FormManifest, CliError> {
    match path {
        Some(path) => {
            log::info!("loading manifest {}", path.display());
            Ok(FormManifest::from_yaml(&read(path)?)?)
        }
        None => Ok(FormManifest::default()),
    }
}

fn summary(manifest: &FormManifest) -> String {
    let rules = &manifest.nickname;
    let mut parts = vec![
        format!("{:?}", manifest.variant).to_lowercase(),
        format!("{} options", manifest.catalog.len()),
    ];
    if rules.required {
        parts.push("nickname required".to_string());
    }
    if let Some(min) = rules.min_length {
        parts.push(format!("min {min}"));
    }
    if let Some(max) = rules.max_length {
        parts.push(format!("max {max}"));
    }
    format!("ok: {} ({})", manifest.name, parts.join(", "))
}

fn check(path: &Path) -> Result<ExitCode, CliError> {
    let manifest = load_manifest(Some(path))?;
    println!("{}", summary(&manifest));
    Ok(ExitCode::SUCCESS)
}

/// Build the form for `manifest` and replay `steps` against it.
fn run_script(manifest: &FormManifest, steps: &[script::Step]) -> Result<FormContainer, CliError> {
    let mut form = FormContainer::from_manifest(manifest);
    let size = form.measure(Constraints::unbounded());
    form.layout(Rect::new(0.0, 0.0, size.width.max(420.0), size.height));

    for step in steps {
        script::apply(&mut form, step)?;
    }
    Ok(form)
}

fn simulate(manifest: Option<&Path>, script_path: &Path) -> Result<ExitCode, CliError> {
    let manifest = load_manifest(manifest)?;
    let steps = script::parse(&read(script_path)?)?;
    log::info!("replaying {} steps", steps.len());

    let form = run_script(&manifest, &steps)?;
    println!("{}", serde_json::to_string_pretty(form.state())?);

    match form.last_outcome() {
        Some(SubmitOutcome::Rejected(errors)) => {
            for (field, messages) in errors {
                eprintln!("{field}: {}", messages.join(", "));
            }
            Ok(ExitCode::FAILURE)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}
