//! # Platforms Command Implementation
//!
//! Prints the effective set of supported `{cloud}-{git}` variants.

use anyhow::Result;

use gitops_bootstrap::config::Settings;

/// Execute the `platforms` command.
pub fn execute(settings: &Settings) -> Result<()> {
    for platform in settings.supported_platforms.iter() {
        println!("{}", platform);
    }
    Ok(())
}
