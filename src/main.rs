// Passport - Federated Patient Identity & Access Control Core
// Copyright (c) 2026 Passport Contributors
// Licensed under the MIT License

use clap::Parser;
use passport::cli::{Cli, Commands};
use passport::config::LoggingConfig;
use passport::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is for long-running hosts
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(log_level, &logging_config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(5);
    }

    let result = match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Register(args) => args.execute(&cli.config).await,
        Commands::GrantConsent(args) => args.execute(&cli.config).await,
        Commands::RevokeConsent(args) => args.execute(&cli.config).await,
        Commands::Audit(args) => args.execute(&cli.config).await,
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            process::exit(5);
        }
    }
}
