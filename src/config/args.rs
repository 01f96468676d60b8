//! Command-line arguments
//!
//! Only startup-level switches live here; everything else comes from
//! [`StaticConfig`](super::StaticConfig).

use clap::{Parser, Subcommand};

use super::StaticConfig;

#[derive(Debug, Parser)]
#[command(name = "hrms-exporter", version, about = "HRMS PostgreSQL metrics exporter")]
pub struct Cli {
    /// Path to the TOML configuration file (optional)
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    pub config: String,

    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the database connection string
    #[arg(long = "database-url")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a sample configuration file to stdout
    GenerateConfig,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut StaticConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref url) = self.database_url {
            config.database.url = url.clone();
        }
    }
}
