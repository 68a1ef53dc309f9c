use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod store;

use commands::{
    ConfigCommand, EditCommand, FetchCommand, PingCommand, RecordCommand, SubmitCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "labform")]
#[command(version)]
#[command(about = "Fill in sectioned lab test records", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log engine and sync decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config(ConfigCommand),

    /// Create, inspect and check record files
    Record(RecordCommand),

    /// Edit one section of a record file
    Edit(EditCommand),

    /// Download a saved record from the backend
    Fetch(FetchCommand),

    /// Submit a record file to the backend
    Submit(SubmitCommand),

    /// Check that the backend is reachable
    Ping(PingCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "labform=debug,labform_core=debug"
    } else {
        "labform=info,labform_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Save config path for init command
    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        Some(Commands::Record(cmd)) => cmd.run(&config)?,
        Some(Commands::Edit(cmd)) => cmd.run(&config)?,
        Some(Commands::Fetch(cmd)) => cmd.run(&config)?,
        Some(Commands::Submit(cmd)) => cmd.run(&config)?,
        Some(Commands::Ping(cmd)) => cmd.run(&config)?,
        None => println!("Use --help to see available commands"),
    }

    Ok(())
}
