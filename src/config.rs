use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ProvisionError, Result};
use crate::warnings::ProvisionWarning;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "ghidra-server.toml";

/// Runtime configuration of the analysis server.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Users to create on the server
    pub users: Vec<String>,

    /// Bind to the private address only
    pub local: bool,

    /// Directory where server projects are stored
    pub ppath: PathBuf,
}

/// Returns the default user list.
fn default_users() -> Vec<String> {
    vec!["admin".to_string()]
}

/// Returns the default project directory.
fn default_ppath() -> PathBuf {
    PathBuf::from("./projects")
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            users: default_users(),
            local: false,
            ppath: default_ppath(),
        }
    }
}

/// Config file as written by the user, every key optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    users: Option<Vec<String>>,
    local: Option<bool>,
    ppath: Option<PathBuf>,
}

/// A loaded configuration and the warnings produced while defaulting it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: ServerConfig,
    pub path: Option<PathBuf>,
    pub warnings: Vec<ProvisionWarning>,
}

/// Finds the config file to use.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `ghidra-server.toml` in current directory
/// 3. `ghidra-server.toml` in user config directory
pub fn locate_config(config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Loads the server configuration, defaulting each absent key.
///
/// Each defaulted key yields one [ProvisionWarning::MissingConfigKey]. A
/// missing file yields [ProvisionWarning::ConfigFileMissing] and all defaults.
///
/// # Returns
/// * `Ok(LoadedConfig)` - Loaded or defaulted configuration
/// * `Err` - If the file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let Some(path) = locate_config(config_path) else {
        let shown = PathBuf::from(CONFIG_FILE_NAME);
        warn!(path = %shown.display(), "no config file found, using defaults");
        return Ok(LoadedConfig {
            config: ServerConfig::default(),
            path: None,
            warnings: vec![ProvisionWarning::ConfigFileMissing { path: shown }],
        });
    };

    if !path.is_file() {
        warn!(path = %path.display(), "config file missing, using defaults");
        return Ok(LoadedConfig {
            config: ServerConfig::default(),
            path: Some(path.clone()),
            warnings: vec![ProvisionWarning::ConfigFileMissing { path }],
        });
    }

    let contents = fs::read_to_string(&path)?;
    let partial: PartialConfig = toml::from_str(&contents)
        .map_err(|e| ProvisionError::config(format!("{}: {}", path.display(), e)))?;

    let (config, warnings) = apply_defaults(partial, &path);
    Ok(LoadedConfig {
        config,
        path: Some(path),
        warnings,
    })
}

fn apply_defaults(partial: PartialConfig, path: &Path) -> (ServerConfig, Vec<ProvisionWarning>) {
    let defaults = ServerConfig::default();
    let mut warnings = Vec::new();
    let mut missing = |key: &'static str, default: String| {
        warn!(key, path = %path.display(), %default, "config key not found, using default");
        warnings.push(ProvisionWarning::MissingConfigKey {
            key,
            path: path.to_path_buf(),
            default,
        });
    };

    let users = partial.users.unwrap_or_else(|| {
        missing("users", format!("{:?}", defaults.users));
        defaults.users
    });
    let local = partial.local.unwrap_or_else(|| {
        missing("local", defaults.local.to_string());
        defaults.local
    });
    let ppath = partial.ppath.unwrap_or_else(|| {
        missing("ppath", defaults.ppath.display().to_string());
        defaults.ppath
    });

    (
        ServerConfig {
            users,
            local,
            ppath,
        },
        warnings,
    )
}

/// Writes `config` as TOML to `path`, replacing any existing file.
pub fn save_config(config: &ServerConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ProvisionError::config(format!("Could not serialize config: {}", e)))?;
    fs::write(path, contents)?;
    Ok(())
}
