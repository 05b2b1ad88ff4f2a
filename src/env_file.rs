use std::fs;
use std::net::IpAddr;
use std::path::Path;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::release::ResolvedRelease;
use crate::version::Version;

/// Default env file name, read by docker-compose from its project directory
pub const ENV_FILE_NAME: &str = ".env";

/// `KEY=value` file handed to docker-compose, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build arguments for a resolved release
    pub fn for_release(release: &ResolvedRelease) -> Self {
        let mut env = Self::new();
        env.set("tag_name", &release.tag_name)
            .set("download_url", &release.download_url)
            .set("zip_file_name", &release.asset_file_name)
            .set("version_number", release.version.to_string())
            .set("commit_sha", &release.commit_sha)
            .set("BUILD_TYPE", "prebuild");
        env
    }

    /// Adds the keys the running container reads
    pub fn with_runtime(
        mut self,
        config: &ServerConfig,
        version: &Version,
        bind_ip: IpAddr,
    ) -> Self {
        self.set("GHIDRA_VERSION", version.to_string())
            .set("GHIDRA_USERS", config.users.join(","))
            .set("GHIDRA_BIND_IP", bind_ip.to_string())
            .set("GHIDRA_PROJECT_PATH", config.ppath.display().to_string());
        self
    }

    /// Sets `key`, replacing an earlier value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}={}\n", key, value))
            .collect()
    }

    /// Overwrites `path` with the rendered file
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }
}
