//! Register command implementation
//!
//! Assigns (or returns) the universal id for a hospital-local patient.

use crate::cli::commands::{cli_context, open_core};
use crate::domain::actor::RolePrincipal;
use crate::domain::ids::PatientRef;
use clap::Args;

/// Arguments for the register command
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Hospital-local patient reference (MRN or similar)
    #[arg(long)]
    pub patient: String,

    /// Acting user reference, for audit attribution
    #[arg(long)]
    pub user: String,
}

impl RegisterArgs {
    /// Execute the register command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let patient_ref = match PatientRef::new(self.patient.clone()) {
            Ok(patient_ref) => patient_ref,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let (_, core) = open_core(config_path).await?;
        let principal = RolePrincipal::with_capabilities(self.user.clone(), []);

        match core
            .registry
            .assign_or_get(&principal, &patient_ref, &cli_context())
            .await
        {
            Ok(identity) => {
                println!("✅ Universal id for patient {}", identity.patient_ref);
                println!();
                println!("   {}", identity.universal_id);
                println!("   bound since {}", identity.created_at.to_rfc3339());
                Ok(0)
            }
            Err(e) => {
                println!("❌ Registration failed: {e}");
                Ok(3)
            }
        }
    }
}
