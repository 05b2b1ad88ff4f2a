use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use crate::docker::{image_tag, ImageRegistry};
use crate::error::{ProvisionError, Result};
use crate::version::Version;

const IMAGE_LISTING_FORMAT: &str = "{{.Repository}}:{{.Tag}}";

/// [ImageRegistry] backed by the `docker` and `docker-compose` command line tools.
///
/// Commands run in `project_dir`, where `docker-compose.yml` and the env file live.
pub struct DockerCompose {
    project_dir: PathBuf,
    service: String,
}

impl DockerCompose {
    pub const DEFAULT_SERVICE: &'static str = "ghidra-server";

    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        DockerCompose {
            project_dir: project_dir.into(),
            service: Self::DEFAULT_SERVICE.to_string(),
        }
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        debug!(program, ?args, "running");
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.project_dir)
            .output()
            .map_err(|e| ProvisionError::image(format!("Failed to execute {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ProvisionError::image(format!(
                "{} {} failed with exit code {}\nStdout: {}\nStderr: {}",
                program,
                args.join(" "),
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(output)
    }
}

impl ImageRegistry for DockerCompose {
    fn daemon_running(&self) -> bool {
        self.run("docker", &["info"]).is_ok()
    }

    fn start_daemon(&self) -> Result<()> {
        self.run("systemctl", &["start", "docker"]).map(|_| ())
    }

    fn has_image(&self, version: &Version) -> Result<bool> {
        let output = self.run("docker", &["images", "--format", IMAGE_LISTING_FORMAT])?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(listing_contains(&listing, &image_tag(version)))
    }

    fn build_image(&self) -> Result<()> {
        self.run("docker-compose", &["build", self.service.as_str()]).map(|_| ())
    }

    fn launch(&self) -> Result<()> {
        self.run("docker-compose", &["up", "-d", self.service.as_str()]).map(|_| ())
    }
}

/// Whether a `repository:tag` listing, one per line, contains `tag` exactly
fn listing_contains(listing: &str, tag: &str) -> bool {
    listing.lines().any(|line| line.trim() == tag)
}
