//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use super::commands;
use guardian::core::models::Scope;
use guardian::output::OutputMode;

/// guardian - Fail-closed verification gateway for git pushes
#[derive(Parser, Debug)]
#[command(
    name = "guardian",
    version,
    about = "Fail-closed verification gateway for git pushes",
    long_about = "Gate every push from AI-assisted development on a deterministic quality pipeline.\n\n\
                  Changed files are checked by external analyzers, a coverage threshold and\n\
                  configuration drift detection. Anything that cannot be verified blocks the push."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize guardian in the current repository
    Init {
        /// Overwrite existing configuration and tool configs
        #[arg(short, long)]
        force: bool,
    },

    /// Verify files changed relative to the compare branch
    Verify,

    /// Verify every tracked file
    Scan,

    /// Verify, then push only if verification passes
    Push {
        /// Remote to push to
        #[arg(default_value = "origin")]
        remote: String,

        /// Branch to push (defaults to the current branch)
        branch: Option<String>,

        /// Force push (uses --force-with-lease)
        #[arg(short, long)]
        force: bool,

        /// Verify only; never push
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage the approved configuration baseline
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },

    /// Print the latest verification report
    Report {
        /// Print this report instead of the latest
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version
    Version,
}

/// `baseline` subcommands
#[derive(Subcommand, Debug)]
pub enum BaselineAction {
    /// Re-approve the current protected configuration
    Update {
        /// Confirm this is a deliberate policy change
        #[arg(long)]
        acknowledge_policy_change: bool,

        /// Why the policy changed (recorded in the baseline metadata)
        #[arg(long)]
        reason: String,
    },

    /// Show the approved baseline
    Show,
}

/// `config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
}

/// Run the CLI
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Init { force }) => commands::init(force, output_mode).map(|()| ExitCode::SUCCESS),
        Some(Command::Verify) => commands::verify(Scope::Changed, output_mode),
        Some(Command::Scan) => commands::verify(Scope::Full, output_mode),
        Some(Command::Push {
            remote,
            branch,
            force,
            dry_run,
        }) => commands::push(&remote, branch.as_deref(), force, dry_run, output_mode),
        Some(Command::Baseline { action }) => {
            commands::baseline(action, output_mode).map(|()| ExitCode::SUCCESS)
        },
        Some(Command::Report { path }) => {
            commands::report(path.as_deref(), output_mode).map(|()| ExitCode::SUCCESS)
        },
        Some(Command::Config {
            action: ConfigAction::Show,
        }) => commands::config_show(output_mode).map(|()| ExitCode::SUCCESS),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": guardian::VERSION
                    })
                );
            } else {
                println!("guardian v{}", guardian::VERSION);
            }
            Ok(ExitCode::SUCCESS)
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": guardian::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("guardian v{}", guardian::VERSION);
                println!("\nRun 'guardian --help' for usage");
                println!("Run 'guardian init' to get started");
            }
            Ok(ExitCode::SUCCESS)
        },
    }
}
