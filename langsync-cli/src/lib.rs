//! CLI library for testing purposes

pub mod sync;
pub mod validation;

pub use sync::{SyncOptions, run_check_command, run_sync_command, run_targets_command};
