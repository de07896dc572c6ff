//! # apidoc CLI entry point
//!
//! Parses arguments, installs tracing, loads configuration once and
//! dispatches to the subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use apidoc_cli::audit::{run_audit, AuditArgs};
use apidoc_cli::endpoint::{run_endpoint, EndpointArgs};
use apidoc_cli::folder::{run_folder, FolderArgs};
use apidoc_cli::logging::{init_tracing, LogFormat};
use apidoc_cli::schema::{run_schema, SchemaArgs};
use apidoc_cli::setup::{load_tools, run_check_config};
use apidoc_cli::tag::{run_tag, TagArgs};
use apidoc_cli::{EXIT_CONFIG, EXIT_FAILURE};

/// Manage API documentation in an Apifox project.
///
/// Every write is normalized, completed with standard error responses and
/// validated before it is sent. Results are printed as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "apidoc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Endpoint tools.
    Endpoint(EndpointArgs),

    /// Data schema tools.
    Schema(SchemaArgs),

    /// Folder tools.
    Folder(FolderArgs),

    /// Tag tools.
    Tag(TagArgs),

    /// Audit every endpoint for documentation completeness.
    Audit(AuditArgs),

    /// Report credential presence and service reachability.
    CheckConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "apidoc starting");

    let result = match cli.command {
        Commands::CheckConfig => run_check_config().await,
        command => {
            let tools = match load_tools(|var| std::env::var(var).ok()) {
                Ok(tools) => tools,
                Err(e) => {
                    tracing::error!("{e:#}");
                    eprintln!("configuration error: {e:#}");
                    return ExitCode::from(EXIT_CONFIG);
                }
            };
            match command {
                Commands::Endpoint(args) => run_endpoint(&args, &tools).await,
                Commands::Schema(args) => run_schema(&args, &tools).await,
                Commands::Folder(args) => run_folder(&args, &tools).await,
                Commands::Tag(args) => run_tag(&args, &tools).await,
                Commands::Audit(args) => run_audit(&args, &tools).await,
                Commands::CheckConfig => run_check_config().await,
            }
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
