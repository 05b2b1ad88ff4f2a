use std::fmt;
use std::path::PathBuf;

/// Non-fatal issues that should be reported to the user before continuing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionWarning {
    /// A key was absent from the config file and has been defaulted
    MissingConfigKey {
        key: &'static str,
        path: PathBuf,
        default: String,
    },
    /// No config file was found; every key is defaulted
    ConfigFileMissing { path: PathBuf },
    /// The container daemon did not answer
    DaemonNotRunning,
}

impl fmt::Display for ProvisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionWarning::MissingConfigKey { key, path, default } => {
                write!(
                    f,
                    "'{}' config not found in {}. Defaulting to {}: {}",
                    key,
                    path.display(),
                    key,
                    default
                )
            }
            ProvisionWarning::ConfigFileMissing { path } => {
                write!(
                    f,
                    "Config file {} not found. Using default configuration",
                    path.display()
                )
            }
            ProvisionWarning::DaemonNotRunning => {
                write!(f, "Docker daemon is not running")
            }
        }
    }
}
