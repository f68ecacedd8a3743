//! Command-line and environment configuration

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the coin catalog server
#[derive(Parser, Debug, Clone)]
#[command(name = "coin-api")]
#[command(about = "Coin catalog API: record intake, listing and PDF export")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite connection string; defaults to a file in the platform data dir
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Largest accepted request body (photo uploads, record submissions)
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "16777216")]
    pub max_body_bytes: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            let data_dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("coin-api");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/coins.db?mode=rwc", data_dir.display())
        })
    }
}
