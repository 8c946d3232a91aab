// src/cli/mod.rs — CLI definition (clap derive)

pub mod serve;

use clap::{Parser, Subcommand};

use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "visitlog", about = "In-memory visit log service", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Log level (overridden by RUST_LOG / VISITLOG_LOG)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the HTTP server and the expiry sweeper (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Commands {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Commands::Serve { host, port } = self {
            if let Some(h) = host {
                config.server.host = h.clone();
            }
            if let Some(p) = port {
                config.server.port = *p;
            }
        }
    }
}

/// Render the effective config.
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
