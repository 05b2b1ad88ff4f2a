use std::fmt;

use crate::error::{ProvisionError, Result};

/// A release version as an ordered tuple of dot-separated components.
///
/// Components are compared as strings, one by one, so `"9.2"` sorts after
/// `"10.0"`. A version that is a strict prefix of another sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    components: Vec<String>,
}

impl Version {
    /// Splits a version string on `.`
    pub fn parse(version: &str) -> Self {
        Version {
            components: version.split('.').map(str::to_string).collect(),
        }
    }

    /// True when the version has no content at all (e.g. parsed from "")
    pub fn is_empty(&self) -> bool {
        self.components.iter().all(String::is_empty)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

/// Extracts the version token from an upstream tag name.
///
/// Upstream tags look like `Ghidra_11.0_build`: the version is the second
/// `_`-separated field.
///
/// # Returns
/// * `Ok(Version)` - The version token, parsed
/// * `Err(MalformedTagName)` - If the tag contains no `_`
///
/// # Example
/// ```ignore
/// assert_eq!(parse_version_from_tag("Ghidra_11.0_build")?.to_string(), "11.0");
/// assert!(parse_version_from_tag("v11.0").is_err());
/// ```
pub fn parse_version_from_tag(tag: &str) -> Result<Version> {
    tag.split('_')
        .nth(1)
        .map(Version::parse)
        .ok_or_else(|| ProvisionError::MalformedTagName(tag.to_string()))
}
