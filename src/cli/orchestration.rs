//! Main workflow orchestration logic
//!
//! Takes a resolved release (or the news that nothing changed) through to a
//! running container. Kept apart from `main.rs` so it can be driven without
//! clap, a terminal, or a docker daemon.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::{save_config, ServerConfig};
use crate::docker::{image_tag, ImageRegistry};
use crate::env_file::{EnvFile, ENV_FILE_NAME};
use crate::error::ProvisionError;
use crate::release::{ReleaseFetcher, ReleaseResolver, ReleaseStore, Resolution, ResolverState};
use crate::ui::{self, ConfirmationPort};
use crate::version::Version;
use crate::warnings::ProvisionWarning;

/// Arguments for the provision workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionArgs {
    /// Path of the release store
    pub releases_path: PathBuf,

    /// Where the env file for docker-compose is written
    pub env_path: PathBuf,

    /// Start the container once the image exists
    pub launch: bool,
}

impl Default for ProvisionArgs {
    fn default() -> Self {
        ProvisionArgs {
            releases_path: PathBuf::from(ReleaseStore::DEFAULT_PATH),
            env_path: PathBuf::from(ENV_FILE_NAME),
            launch: true,
        }
    }
}

/// Result of a successful provision workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionOutcome {
    /// Version the server runs
    pub version: Version,

    /// Whether an image was built during this run
    pub built: bool,

    /// Address the server is bound to
    pub bind_ip: IpAddr,

    /// Whether the container was started
    pub launched: bool,
}

/// Capabilities the workflow runs against.
pub struct Provisioner<'a> {
    pub fetcher: &'a ReleaseFetcher,
    pub images: &'a dyn ImageRegistry,
    pub confirm: &'a dyn ConfirmationPort,
    pub lookup_ip: fn(bool) -> crate::Result<IpAddr>,
}

impl<'a> Provisioner<'a> {
    /// Runs the whole workflow:
    /// 1. Ensure the project directory exists
    /// 2. Make sure the container daemon is up
    /// 3. Resolve the latest release against the release store
    /// 4. Write the env file and build the image if needed
    /// 5. Launch the container on the chosen address
    pub fn run(&self, config: &ServerConfig, args: &ProvisionArgs) -> Result<ProvisionOutcome> {
        ensure_project_dir(&config.ppath)?;
        self.ensure_daemon()?;

        let mut store = ReleaseStore::load(&args.releases_path).context("loading release store")?;

        ui::display_status("Checking for a new release...");
        let mut resolver = ReleaseResolver::new(&mut store, self.fetcher, self.images);
        let resolution = resolver.resolve().map_err(|e| {
            let step = resolver.failed_during().unwrap_or(ResolverState::Failed);
            anyhow::Error::new(e).context(format!("release resolution failed while {}", step))
        })?;

        let bind_ip = (self.lookup_ip)(config.local).context("determining bind address")?;

        let (version, built) = match resolution {
            Resolution::UpToDate { version } => {
                ui::display_success(&format!("Image {} is up to date", image_tag(&version)));
                EnvFile::new()
                    .with_runtime(config, &version, bind_ip)
                    .write(&args.env_path)
                    .context("writing env file")?;
                (version, false)
            }
            Resolution::NeedsBuild(release) => {
                ui::display_release(&release);
                EnvFile::for_release(&release)
                    .with_runtime(config, &release.version, bind_ip)
                    .write(&args.env_path)
                    .context("writing env file")?;
                let built = self.ensure_image(&release.version)?;
                (release.version, built)
            }
        };

        if args.launch {
            self.images.launch().context("launching container")?;
            ui::display_success(&format!("Started {} on {}", image_tag(&version), bind_ip));
        }

        Ok(ProvisionOutcome {
            version,
            built,
            bind_ip,
            launched: args.launch,
        })
    }

    fn ensure_daemon(&self) -> Result<()> {
        if self.images.daemon_running() {
            return Ok(());
        }

        ui::display_warning(&ProvisionWarning::DaemonNotRunning);
        if !self
            .confirm
            .confirm("Would you like to try and start the docker daemon?")?
        {
            bail!("docker daemon is not running");
        }

        self.images
            .start_daemon()
            .context("starting docker daemon")?;
        if !self.images.daemon_running() {
            bail!("docker daemon did not come up after starting it");
        }
        Ok(())
    }

    /// Builds the image for `version` unless it exists; returns whether it built
    fn ensure_image(&self, version: &Version) -> Result<bool> {
        if self.images.has_image(version)? {
            return Ok(false);
        }

        ui::display_status(&format!("Building image {}", image_tag(version)));
        self.images.build_image().context("building image")?;

        if !self.images.has_image(version)? {
            let msg = format!("Could not build image {}", image_tag(version));
            return Err(ProvisionError::image(msg).into());
        }
        info!(%version, "image built");
        Ok(true)
    }
}

/// Makes sure `ppath` is a directory, creating it if absent.
pub fn ensure_project_dir(ppath: &Path) -> Result<()> {
    if ppath.exists() {
        if !ppath.is_dir() {
            let msg = format!("{} is a file, not a directory", ppath.display());
            return Err(ProvisionError::config(msg).into());
        }
        return Ok(());
    }

    fs::create_dir_all(ppath)
        .with_context(|| format!("Could not create project directory: {}", ppath.display()))
}

/// Saves the command-line configuration to `path`.
///
/// An existing file is only replaced after confirmation (default no).
///
/// # Returns
/// * `Ok(true)` - The file was written
/// * `Ok(false)` - The user kept the existing file
pub fn persist_config(
    config: &ServerConfig,
    path: &Path,
    confirm: &dyn ConfirmationPort,
) -> Result<bool> {
    if path.exists() && !confirm.confirm("Config file exists, update with current config?")? {
        return Ok(false);
    }

    save_config(config, path).with_context(|| format!("writing config file {}", path.display()))?;
    Ok(true)
}
