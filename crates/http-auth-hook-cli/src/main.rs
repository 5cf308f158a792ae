// crates/http-auth-hook-cli/src/main.rs
// ============================================================================
// Module: HTTP Auth Probe Entry Point
// Description: Command dispatcher for one-shot auth checks and config checks.
// Purpose: Let operators verify an authorization service before broker rollout.
// Dependencies: clap, http-auth-hook, http-auth-hook-cli, thiserror
// ============================================================================

//! ## Overview
//! `http-auth-probe` loads the hook configuration file, initializes the HTTP
//! auth hook, and runs a single connect or ACL check, printing `allow` or
//! `deny`. Exit codes: 0 for allow or valid config, 2 for deny, 1 for errors.
//! Audit events for each check are written to stderr as JSON lines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use http_auth_hook_cli::ProbeCheck;
use http_auth_hook_cli::ProbeConfig;
use http_auth_hook_cli::build_hook;
use http_auth_hook_cli::run_probe;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code reported when the service denies the check.
const EXIT_DENY: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "http-auth-probe", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to the hook config file (overrides `HTTP_AUTH_HOOK_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a connect-authenticate check.
    Connect(ConnectCommand),
    /// Run a topic access check.
    Acl(AclCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `connect`.
#[derive(Args, Debug)]
struct ConnectCommand {
    /// Client identifier presented by the client.
    #[arg(long, value_name = "ID")]
    client_id: String,
    /// Username presented at connect.
    #[arg(long, value_name = "NAME", default_value = "")]
    username: String,
    /// Password presented at connect.
    #[arg(long, value_name = "SECRET", default_value = "")]
    password: String,
}

/// Arguments for `acl`.
#[derive(Args, Debug)]
struct AclCommand {
    /// Client identifier of the session.
    #[arg(long, value_name = "ID")]
    client_id: String,
    /// Username bound to the session.
    #[arg(long, value_name = "NAME", default_value = "")]
    username: String,
    /// Topic to check.
    #[arg(long, value_name = "TOPIC")]
    topic: String,
    /// Check publish (write) access instead of subscribe (read).
    #[arg(long)]
    write: bool,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the hook configuration file.
    Validate,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and dispatches the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = ProbeConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    match cli.command {
        Commands::Connect(command) => command_check(
            &config,
            &ProbeCheck::Connect {
                client_id: command.client_id,
                username: command.username,
                password: command.password,
            },
        ),
        Commands::Acl(command) => command_check(
            &config,
            &ProbeCheck::Acl {
                client_id: command.client_id,
                username: command.username,
                topic: command.topic,
                write: command.write,
            },
        ),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => {
            write_stdout_line("config valid")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs one check and maps the decision to an exit code.
fn command_check(config: &ProbeConfig, check: &ProbeCheck) -> CliResult<ExitCode> {
    let hook = build_hook(config, None).map_err(|err| CliError::new(err.to_string()))?;
    let allowed = run_probe(&hook, check);
    let label = if allowed { "allow" } else { "deny" };
    write_stdout_line(label).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(if allowed { ExitCode::SUCCESS } else { ExitCode::from(EXIT_DENY) })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
