use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::docker::{image_tag, ImageRegistry};
use crate::error::{ProvisionError, Result};
use crate::version::Version;

/// Mock image registry for testing without a container daemon
pub struct MockImages {
    images: RefCell<HashSet<String>>,
    daemon_running: Cell<bool>,
    daemon_starts: bool,
    build_produces: Option<Version>,
    builds: Cell<usize>,
    launches: Cell<usize>,
}

impl MockImages {
    /// Create a mock with a running daemon and no images
    pub fn new() -> Self {
        MockImages {
            images: RefCell::new(HashSet::new()),
            daemon_running: Cell::new(true),
            daemon_starts: true,
            build_produces: None,
            builds: Cell::new(0),
            launches: Cell::new(0),
        }
    }

    /// Add an existing image for `version`
    pub fn with_image(self, version: &str) -> Self {
        self.images
            .borrow_mut()
            .insert(image_tag(&Version::parse(version)));
        self
    }

    /// Make `build_image` produce an image for `version`
    pub fn building(mut self, version: &str) -> Self {
        self.build_produces = Some(Version::parse(version));
        self
    }

    /// Daemon starts stopped; `starts` decides whether `start_daemon` succeeds
    pub fn with_stopped_daemon(mut self, starts: bool) -> Self {
        self.daemon_running.set(false);
        self.daemon_starts = starts;
        self
    }

    pub fn builds(&self) -> usize {
        self.builds.get()
    }

    pub fn launches(&self) -> usize {
        self.launches.get()
    }
}

impl Default for MockImages {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageRegistry for MockImages {
    fn daemon_running(&self) -> bool {
        self.daemon_running.get()
    }

    fn start_daemon(&self) -> Result<()> {
        if self.daemon_starts {
            self.daemon_running.set(true);
            Ok(())
        } else {
            Err(ProvisionError::image("daemon refused to start"))
        }
    }

    fn has_image(&self, version: &Version) -> Result<bool> {
        Ok(self.images.borrow().contains(&image_tag(version)))
    }

    fn build_image(&self) -> Result<()> {
        self.builds.set(self.builds.get() + 1);
        if let Some(version) = &self.build_produces {
            self.images.borrow_mut().insert(image_tag(version));
        }
        Ok(())
    }

    fn launch(&self) -> Result<()> {
        self.launches.set(self.launches.get() + 1);
        Ok(())
    }
}
