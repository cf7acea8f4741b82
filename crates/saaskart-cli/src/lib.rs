// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

use clap::{error::ErrorKind, ArgAction, Parser, Subcommand};
use saaskart_core::{ErrorCode, ExitCode, MachineError, ENV_SAASKART_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

pub const CRATE_NAME: &str = "saaskart-cli";

const SAASKART_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "saaskart", version)]
#[command(about = "SaaSKart directory search CLI")]
#[command(help_template = SAASKART_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  SAASKART_LOG_LEVEL     Log filter override (tracing EnvFilter syntax)\n  SAASKART_POLICY_ROOT   Directory holding configs/policy/policy.json"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Directory holding `configs/policy/policy.json`.
    #[arg(long, global = true)]
    policy_root: Option<PathBuf>,
    #[arg(long = "print-config-paths", default_value_t = false)]
    print_config_paths: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the company schema in a SQLite database.
    InitDb {
        #[arg(long)]
        db: PathBuf,
    },
    /// Import a directory snapshot (categories and companies) from JSON.
    Import {
        #[arg(long)]
        db: PathBuf,
        #[arg(long)]
        file: PathBuf,
    },
    /// Run a faceted company search.
    Search {
        #[arg(long)]
        db: PathBuf,
        /// Raw search parameter as `key=value`; repeat for multiselect facets.
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
    /// Print the option domain of one facet.
    FacetOptions {
        #[arg(long)]
        db: PathBuf,
        name: String,
    },
    /// Show compiled SQL, bound parameters and the SQLite query plan.
    Explain {
        #[arg(long)]
        db: PathBuf,
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
    /// List the facet registry.
    Registry,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    pub(crate) exit_code: ExitCode,
    pub(crate) machine: MachineError,
}

impl CliError {
    pub(crate) fn new(code: ErrorCode, message: impl AsRef<str>) -> Self {
        Self {
            exit_code: code.exit_code(),
            machine: MachineError::new(code.as_str(), message.as_ref()),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("UsageError", message),
        }
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            output::emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()));
            }
        },
    };
    init_logging(cli.quiet || (cli.json && cli.verbose == 0), cli.verbose);
    let output_mode = OutputMode { json: cli.json };

    if cli.print_config_paths {
        return commands::emit_config_paths(output_mode).map_err(CliError::internal);
    }
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    let policy_root = cli.policy_root;

    match command {
        Commands::InitDb { db } => commands::init_db(&db, output_mode),
        Commands::Import { db, file } => commands::import(&db, &file, output_mode),
        Commands::Search { db, params } => {
            commands::search(&db, &params, policy_root.as_deref(), output_mode)
        }
        Commands::FacetOptions { db, name } => commands::facet_options(&db, &name, output_mode),
        Commands::Explain { db, params } => {
            commands::explain(&db, &params, policy_root.as_deref(), output_mode)
        }
        Commands::Registry => commands::registry(output_mode).map_err(CliError::internal),
    }
}

/// Logs go to stderr so stdout stays machine-readable. `--json` without
/// `--verbose` keeps stderr to the single machine error line.
fn init_logging(quiet: bool, verbose: u8) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_env(ENV_SAASKART_LOG_LEVEL)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
