// src/main.rs — visitlog entry point

use std::path::Path;

use clap::Parser;

use visitlog::cli::{self, Cli, Commands};
use visitlog::infra::config::Config;
use visitlog::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;
    config.apply_port_override(std::env::var("PORT").ok())?;

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    command.apply_overrides(&mut config);

    logger::init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    match command {
        Commands::Serve { .. } => cli::serve::run_serve(&config).await,
        Commands::Config => {
            print!("{}", cli::render_config(&config)?);
            Ok(())
        }
    }
}
