//! Container runtime abstraction
//!
//! The provisioning workflow only needs a handful of container operations,
//! expressed by the [ImageRegistry] trait:
//!
//! - [compose::DockerCompose]: shells out to `docker` and `docker-compose`
//! - [mock::MockImages]: in-memory implementation for tests
//!
//! Code that decides *whether* to build should depend on the trait so it can
//! be exercised without a docker daemon.

pub mod compose;
pub mod mock;

pub use compose::DockerCompose;
pub use mock::MockImages;

use crate::error::Result;
use crate::version::Version;

/// Tag of the server image built for `version`, e.g. `ghidra:ghidra11.0`
pub fn image_tag(version: &Version) -> String {
    format!("ghidra:ghidra{}", version)
}

/// Container operations needed to build and run the analysis server.
pub trait ImageRegistry {
    /// Whether the container daemon answers
    fn daemon_running(&self) -> bool;

    /// Attempts to start the container daemon
    fn start_daemon(&self) -> Result<()>;

    /// Whether an image for `version` already exists locally
    ///
    /// # Returns
    /// * `Ok(true)` - An image tagged [image_tag] exists
    /// * `Ok(false)` - No such image
    /// * `Err` - The image list could not be obtained
    fn has_image(&self, version: &Version) -> Result<bool>;

    /// Builds the server image from the current env file
    fn build_image(&self) -> Result<()>;

    /// Starts the server container in the background
    fn launch(&self) -> Result<()>;
}
