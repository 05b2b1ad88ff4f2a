//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use crate::release::ResolvedRelease;
use crate::warnings::ProvisionWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a provisioning warning to the user.
pub fn display_warning(warning: &ProvisionWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// Display the release that is about to be built.
///
/// # Arguments
/// * `release` - The fully resolved release
pub fn display_release(release: &ResolvedRelease) {
    println!("\n\x1b[1mNew release {}\x1b[0m", release.version);
    println!("  Tag:    {}", release.tag_name);
    println!("  Commit: {}", short_sha(&release.commit_sha));
    println!("  Asset:  \x1b[36m{}\x1b[0m", release.asset_file_name);
}

/// First seven characters of a commit SHA
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
