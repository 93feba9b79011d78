use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

use codexagent::cli;
use codexagent::cli_types::Cli;

#[tokio::main]
async fn main() {
    // .env in the current directory, if any
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "codexagent=info" } else { "warn" };
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = cli::run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
