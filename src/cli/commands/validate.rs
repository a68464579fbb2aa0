//! Validate-config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also probe store connectivity
    #[arg(long)]
    pub check_store: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🔍 Validating configuration: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration invalid");
                println!("   {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration valid");
        println!("   environment:  {:?}", config.environment);
        println!("   store_target: {:?}", config.store_target);
        println!(
            "   consent:      single_use={}, log_denied_attempts={}, max_duration={}m",
            config.consent.single_use,
            config.consent.log_denied_attempts,
            config.consent.max_duration_minutes
        );
        println!("   emergency:    {} role(s)", config.emergency.roles.len());

        if self.check_store {
            println!();
            println!("🔌 Probing store...");
            let handles = match crate::adapters::store::create_store(&config).await {
                Ok(handles) => handles,
                Err(e) => {
                    println!("❌ Store creation failed: {e}");
                    return Ok(3);
                }
            };
            if let Err(e) = handles.lifecycle.test_connection().await {
                println!("❌ Store connection failed: {e}");
                return Ok(3);
            }
            println!("✅ Store reachable ({})", handles.lifecycle.backend_name());
        }

        Ok(0)
    }
}
