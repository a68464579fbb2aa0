//! Status command implementation
//!
//! Probes the configured store and reports record counts.

use crate::cli::commands::open_store;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Create the schema if it does not exist yet
    #[arg(long)]
    pub ensure_schema: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (_, handles) = match open_store(config_path).await {
            Ok(pair) => pair,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        if let Err(e) = handles.lifecycle.test_connection().await {
            println!("❌ Store connection failed: {e}");
            return Ok(3);
        }

        if self.ensure_schema {
            if let Err(e) = handles.lifecycle.ensure_schema().await {
                println!("❌ Schema bootstrap failed: {e}");
                return Ok(3);
            }
            println!("✅ Schema ensured");
        }

        let counts = futures::try_join!(
            handles.identities.count_identities(),
            handles.consents.count_tokens(),
            handles.overrides.count_overrides(),
            handles.audit.count_entries(),
        );

        match counts {
            Ok((identities, tokens, overrides, entries)) => {
                println!("📊 Passport status ({})", handles.lifecycle.backend_name());
                println!();
                println!("   universal identities: {identities}");
                println!("   consent tokens:       {tokens}");
                println!("   emergency overrides:  {overrides}");
                println!("   audit entries:        {entries}");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to query counts: {e}");
                Ok(3)
            }
        }
    }
}
