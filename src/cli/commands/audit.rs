//! Audit command implementation
//!
//! Read-only view over the audit trail for dashboards and override review.

use crate::cli::commands::open_core;
use crate::domain::ids::PatientRef;
use clap::Args;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Hospital-local patient reference
    #[arg(long)]
    pub patient: String,

    /// Show emergency overrides instead of the full trail
    #[arg(long)]
    pub overrides: bool,

    /// Limit output to the most recent N entries
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

impl AuditArgs {
    /// Execute the audit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let patient_ref = match PatientRef::new(self.patient.clone()) {
            Ok(patient_ref) => patient_ref,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        let (_, core) = open_core(config_path).await?;

        if self.overrides {
            let overrides = match core
                .ledger
                .query_emergency_overrides_for_patient(&patient_ref)
                .await
            {
                Ok(overrides) => overrides,
                Err(e) => {
                    println!("❌ Query failed: {e}");
                    return Ok(3);
                }
            };

            println!(
                "🚨 Emergency overrides for {} ({} total)",
                patient_ref,
                overrides.len()
            );
            println!();
            for o in overrides.iter().take(self.limit) {
                println!(
                    "   {}  {}  {}  \"{}\"",
                    o.access_time.to_rfc3339(),
                    o.requesting_user,
                    o.ip_address,
                    o.justification
                );
            }
        } else {
            let entries = match core.ledger.query_for_patient(&patient_ref).await {
                Ok(entries) => entries,
                Err(e) => {
                    println!("❌ Query failed: {e}");
                    return Ok(3);
                }
            };

            println!("📜 Audit trail for {} ({} total)", patient_ref, entries.len());
            println!();
            for e in entries.iter().take(self.limit) {
                println!(
                    "   {}  {:<14}  {:<6}  {}  {}",
                    e.access_time.to_rfc3339(),
                    e.access_type,
                    e.action,
                    e.user_ref,
                    e.details
                );
            }
        }

        Ok(0)
    }
}
