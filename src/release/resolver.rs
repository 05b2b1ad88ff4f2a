use std::fmt;

use tracing::{debug, info};

use crate::docker::ImageRegistry;
use crate::error::{ProvisionError, Result};
use crate::release::{LatestRelease, ReleaseFetcher, ReleaseStore, TagResolver};
use crate::version::{parse_version_from_tag, Version};

/// Progress of a single resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Start,
    FetchedLatest,
    ParsedVersion,
    UpToDate,
    NeedsBuild,
    ResolvedArtifact,
    Done,
    Failed,
}

impl fmt::Display for ResolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            ResolverState::Start => "fetching latest release",
            ResolverState::FetchedLatest => "parsing release version",
            ResolverState::ParsedVersion => "comparing with known releases",
            ResolverState::UpToDate => "up to date",
            ResolverState::NeedsBuild => "resolving release artifact",
            ResolverState::ResolvedArtifact => "validating resolved release",
            ResolverState::Done => "done",
            ResolverState::Failed => "failed",
        };
        write!(f, "{}", step)
    }
}

/// Everything the image build needs to know about a release
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRelease {
    pub tag_name: String,
    pub download_url: String,
    pub asset_file_name: String,
    pub version: Version,
    pub commit_sha: String,
}

impl ResolvedRelease {
    /// Fails with `IncompleteRelease` naming every empty field
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&'static str> = [
            ("tag_name", self.tag_name.is_empty()),
            ("download_url", self.download_url.is_empty()),
            ("zip_file_name", self.asset_file_name.is_empty()),
            ("version_number", self.version.is_empty()),
            ("commit_sha", self.commit_sha.is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, empty)| empty.then_some(field))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProvisionError::IncompleteRelease { missing })
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No newer release and a local image for `version` already exists
    UpToDate { version: Version },
    /// An image must be built for this release
    NeedsBuild(ResolvedRelease),
}

/// Decides whether a new upstream release must be built.
///
/// The store is only written once the release is fully resolved, so a
/// failure at any step leaves it untouched.
pub struct ReleaseResolver<'a> {
    store: &'a mut ReleaseStore,
    fetcher: &'a ReleaseFetcher,
    images: &'a dyn ImageRegistry,
    state: ResolverState,
    failed_during: Option<ResolverState>,
}

impl<'a> ReleaseResolver<'a> {
    pub fn new(
        store: &'a mut ReleaseStore,
        fetcher: &'a ReleaseFetcher,
        images: &'a dyn ImageRegistry,
    ) -> Self {
        ReleaseResolver {
            store,
            fetcher,
            images,
            state: ResolverState::Start,
            failed_during: None,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    /// The step that was in progress when the last run failed
    pub fn failed_during(&self) -> Option<ResolverState> {
        self.failed_during
    }

    pub fn resolve(&mut self) -> Result<Resolution> {
        self.state = ResolverState::Start;
        self.failed_during = None;

        match self.run() {
            Ok(resolution) => {
                self.state = ResolverState::Done;
                Ok(resolution)
            }
            Err(e) => {
                self.failed_during = Some(self.state);
                self.state = ResolverState::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self) -> Result<Resolution> {
        let url = self.fetcher.latest_release_url();
        let body = self
            .fetcher
            .fetch_latest_metadata()
            .ok_or_else(|| ProvisionError::fetch(&url, "no data returned"))?;
        let latest: LatestRelease = serde_json::from_str(&body)
            .map_err(|source| ProvisionError::DecodeError { url, source })?;
        self.state = ResolverState::FetchedLatest;

        let tag_name = latest
            .tag_name
            .clone()
            .ok_or(ProvisionError::MissingTagName)?;
        let version = parse_version_from_tag(&tag_name)?;
        self.state = ResolverState::ParsedVersion;
        debug!(%tag_name, %version, "latest upstream release");

        if !self.store.is_newer(&version) && self.images.has_image(&version)? {
            info!(%version, "release already built");
            self.state = ResolverState::UpToDate;
            return Ok(Resolution::UpToDate { version });
        }
        self.state = ResolverState::NeedsBuild;

        let asset = latest
            .first_asset()
            .ok_or_else(|| ProvisionError::NoAssets {
                tag: tag_name.clone(),
            })?;
        let commit_sha = TagResolver::new(self.fetcher).resolve(&tag_name)?;
        self.state = ResolverState::ResolvedArtifact;

        let release = ResolvedRelease {
            tag_name,
            download_url: asset.browser_download_url.clone(),
            asset_file_name: asset.name.clone(),
            version,
            commit_sha,
        };
        release.validate()?;

        if self
            .store
            .record_if_newer(&release.version, &release.commit_sha)?
        {
            info!(version = %release.version, sha = %release.commit_sha, "new release recorded");
        }

        Ok(Resolution::NeedsBuild(release))
    }
}
