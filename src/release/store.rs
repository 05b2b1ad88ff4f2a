use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::version::Version;

/// On-disk layout of the release file.
///
/// Keys other than `release-hashes` are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct ReleaseFile {
    #[serde(rename = "release-hashes")]
    release_hashes: BTreeMap<String, String>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Persistent record of known release versions and their commit hashes.
///
/// Every successful mutation rewrites the whole file immediately.
#[derive(Debug, Clone)]
pub struct ReleaseStore {
    path: PathBuf,
    file: ReleaseFile,
}

impl ReleaseStore {
    /// Default location of the release file, relative to the working directory
    pub const DEFAULT_PATH: &'static str = "releases.json";

    /// Loads the release file at `path`.
    ///
    /// # Returns
    /// * `Err(ConfigMissing)` - If the file does not exist (or is a directory)
    /// * `Err(MalformedData)` - If it is not valid JSON of the expected shape
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ProvisionError::ConfigMissing { path });
        }

        let contents = fs::read_to_string(&path)?;
        let file = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(source) => return Err(ProvisionError::MalformedData { path, source }),
        };

        debug!(path = %path.display(), "loaded release store");
        Ok(ReleaseStore { path, file })
    }

    /// All known releases as `(version, commit hash)` pairs
    pub fn releases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.file
            .release_hashes
            .iter()
            .map(|(version, hash)| (version.as_str(), hash.as_str()))
    }

    /// The greatest known version under tuple ordering, with its commit hash
    pub fn latest(&self) -> Result<(Version, &str)> {
        self.releases()
            .map(|(version, hash)| (Version::parse(version), hash))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .ok_or(ProvisionError::EmptyStore)
    }

    /// Whether `candidate` strictly exceeds the latest known version.
    ///
    /// Every candidate is newer than an empty store.
    pub fn is_newer(&self, candidate: &Version) -> bool {
        match self.latest() {
            Ok((latest, _)) => *candidate > latest,
            Err(_) => true,
        }
    }

    /// Records `candidate` with `hash` if it is newer than every known release.
    ///
    /// # Returns
    /// * `Ok(true)` - The release was inserted and the file rewritten
    /// * `Ok(false)` - Not newer; nothing changed
    pub fn record_if_newer(&mut self, candidate: &Version, hash: &str) -> Result<bool> {
        if !self.is_newer(candidate) {
            return Ok(false);
        }

        self.file
            .release_hashes
            .insert(candidate.to_string(), hash.to_string());
        self.save()?;
        debug!(version = %candidate, hash, "recorded new release");
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.file).map_err(|source| {
            ProvisionError::MalformedData {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
