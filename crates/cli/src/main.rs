mod config_cmd;
mod parse_cmd;
mod scan_cmd;

use clap::{Parser, Subcommand};
use sckm_daemon::SchedulerError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sckm",
    version,
    about = "SC Kill Monitor - follow your deaths in the Star Citizen game log"
)]
struct Cli {
    /// Log scanner details (every cycle, every parsed kill)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the selected channel's game log until Ctrl+C
    Scan(scan_cmd::ScanArgs),

    /// Extract kill events from a log file once and print them
    Parse(parse_cmd::ParseArgs),

    /// Show or change the persisted settings
    Config(config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Scan(args) => scan_cmd::run(args).await,
        Commands::Parse(args) => parse_cmd::run(args),
        Commands::Config(args) => config_cmd::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        let code = if e.downcast_ref::<SchedulerError>().is_some() {
            2
        } else {
            1
        };
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr; stdout only carries kill blocks.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    for target in ["sckm", "sckm_daemon", "sckm_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
