//! Command-line workflow, independent of argument parsing

pub mod orchestration;

pub use orchestration::{persist_config, ProvisionArgs, ProvisionOutcome, Provisioner};
