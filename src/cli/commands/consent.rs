//! Grant-consent and revoke-consent command implementations

use crate::cli::commands::open_core;
use crate::domain::ids::{TokenId, UniversalId};
use clap::Args;

/// Arguments for the grant-consent command
#[derive(Args, Debug)]
pub struct GrantConsentArgs {
    /// Universal patient id the token authorizes access to
    #[arg(long)]
    pub universal_id: String,

    /// Token lifetime in minutes
    #[arg(long)]
    pub duration_minutes: i64,

    /// Issuing user reference
    #[arg(long)]
    pub user: String,
}

impl GrantConsentArgs {
    /// Execute the grant-consent command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let universal_id = match UniversalId::new(self.universal_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let (_, core) = open_core(config_path).await?;

        match core
            .consents
            .issue(&universal_id, self.duration_minutes, &self.user)
            .await
        {
            Ok(token) => {
                println!("✅ Consent token issued for {}", token.universal_id);
                println!();
                // The code is shown here, to the operator handing it to the
                // patient, and nowhere else. It is never logged.
                println!("   code:       {}", token.code.as_str());
                println!("   token id:   {}", token.token_id);
                println!("   expires at: {}", token.expires_at.to_rfc3339());
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to issue consent token: {e}");
                Ok(3)
            }
        }
    }
}

/// Arguments for the revoke-consent command
#[derive(Args, Debug)]
pub struct RevokeConsentArgs {
    /// Token id to revoke
    #[arg(long)]
    pub token_id: String,
}

impl RevokeConsentArgs {
    /// Execute the revoke-consent command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let token_id = match TokenId::new(self.token_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let (_, core) = open_core(config_path).await?;

        match core.consents.revoke(&token_id).await {
            Ok(true) => {
                println!("✅ Consent token {token_id} revoked");
                Ok(0)
            }
            Ok(false) => {
                println!("❌ No consent token with id {token_id}");
                Ok(2)
            }
            Err(e) => {
                println!("❌ Failed to revoke consent token: {e}");
                Ok(3)
            }
        }
    }
}
