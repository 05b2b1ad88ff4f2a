use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::release::{ObjectRef, ReleaseFetcher, TagObject};

/// Resolves a tag name to the commit it identifies.
///
/// Lightweight tags point straight at a commit. Annotated tags point at a
/// tag object, which is dereferenced once more to reach the commit.
pub struct TagResolver<'a> {
    fetcher: &'a ReleaseFetcher,
}

impl<'a> TagResolver<'a> {
    pub fn new(fetcher: &'a ReleaseFetcher) -> Self {
        TagResolver { fetcher }
    }

    pub fn resolve(&self, tag_name: &str) -> Result<String> {
        let url = self.fetcher.tag_ref_url(tag_name);
        let tag_ref: TagObject = self.fetcher.fetch_json(&url)?;
        let (sha, kind) = object_fields(tag_ref, &url)?;

        if kind == "commit" {
            return Ok(sha);
        }

        debug!(tag_name, %sha, %kind, "dereferencing annotated tag");
        let url = self.fetcher.tag_object_url(&sha);
        let tag_object: TagObject = self.fetcher.fetch_json(&url)?;
        let (commit_sha, _) = object_fields(tag_object, &url)?;
        Ok(commit_sha)
    }
}

/// Pulls `object.sha` and `object.type` out of a response, both required.
fn object_fields(response: TagObject, url: &str) -> Result<(String, String)> {
    let ObjectRef { sha, kind } = response.object.ok_or_else(|| missing("object", url))?;
    let sha = sha.ok_or_else(|| missing("sha", url))?;
    let kind = kind.ok_or_else(|| missing("type", url))?;
    Ok((sha, kind))
}

fn missing(field: &str, url: &str) -> ProvisionError {
    ProvisionError::resolution(format!("'{}' missing from {}", field, url))
}
