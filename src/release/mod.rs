//! Release resolution
//!
//! Decides whether upstream has published a release we have not built yet,
//! and if so gathers everything the image build needs:
//!
//! - [store::ReleaseStore]: local record of known versions and commit hashes
//! - [fetcher::ReleaseFetcher]: HTTP access to the upstream release API
//! - [tag::TagResolver]: tag name to commit SHA, through annotated tags
//! - [resolver::ReleaseResolver]: the workflow tying the three together

pub mod fetcher;
pub mod resolver;
pub mod store;
pub mod tag;

pub use fetcher::ReleaseFetcher;
pub use resolver::{ReleaseResolver, Resolution, ResolvedRelease, ResolverState};
pub use store::ReleaseStore;
pub use tag::TagResolver;

use serde::Deserialize;

/// Subset of the upstream "latest release" response we consume
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LatestRelease {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<ReleaseAsset>>,
}

impl LatestRelease {
    /// The first downloadable asset, if the release has any
    pub fn first_asset(&self) -> Option<&ReleaseAsset> {
        self.assets.as_ref().and_then(|assets| assets.first())
    }
}

/// Downloadable artifact attached to a release
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub browser_download_url: String,
    #[serde(default)]
    pub name: String,
}

/// Response of the tag reference and tag object endpoints.
///
/// Both wrap the object they point at under `object`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TagObject {
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObjectRef {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
