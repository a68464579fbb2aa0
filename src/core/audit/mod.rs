//! Access audit ledger

pub mod ledger;

pub use ledger::AccessAuditLedger;
