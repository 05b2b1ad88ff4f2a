pub mod cli;
pub mod config;
pub mod docker;
pub mod env_file;
pub mod error;
pub mod logging;
pub mod network;
pub mod release;
pub mod ui;
pub mod version;
pub mod warnings;

pub use error::{ProvisionError, Result};
