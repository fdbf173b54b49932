//! # Metaphor Command Implementation
//!
//! Assembles the metaphor repository out of an already pruned gitops tree.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use gitops_bootstrap::config::{GitProvider, Settings};
use gitops_bootstrap::phases::metaphor::MetaphorAdjustment;
use gitops_bootstrap::provisioner::Provisioner;

/// Assemble the metaphor repository from a pruned gitops tree
#[derive(Args, Debug)]
pub struct MetaphorArgs {
    /// Pruned gitops tree holding metaphor/ and ci/
    #[arg(long, value_name = "PATH")]
    pub gitops_dir: PathBuf,

    /// Directory the metaphor repository is created in (as <dir>/metaphor)
    #[arg(long, value_name = "PATH")]
    pub base_dir: PathBuf,

    /// URL attached as the origin remote
    #[arg(long, value_name = "URL")]
    pub destination_url: String,

    /// Name of the metaphor repository written into repos.tf
    #[arg(long, default_value = "metaphor")]
    pub metaphor_repo_name: String,

    /// Git provider deciding which CI content is copied (github, gitlab)
    #[arg(long, default_value = "github")]
    pub git_provider: String,

    /// Print the steps without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl MetaphorArgs {
    pub fn adjustment(&self) -> MetaphorAdjustment {
        MetaphorAdjustment {
            destination_metaphor_repo_git_url: self.destination_url.clone(),
            gitops_repo_dir: self.gitops_dir.clone(),
            metaphor_repo_name: self.metaphor_repo_name.clone(),
            git_provider: GitProvider::from(self.git_provider.as_str()),
            base_dir: self.base_dir.clone(),
        }
    }
}

/// Execute the `metaphor` command.
pub fn execute(args: MetaphorArgs, settings: &Settings) -> Result<()> {
    let provisioner = Provisioner::new(settings);
    let adjustment = args.adjustment();

    if args.dry_run {
        super::print_plan(&provisioner.metaphor_plan(&adjustment));
        return Ok(());
    }

    provisioner.adjust_metaphor_repo(&adjustment)?;
    println!(
        "✅ Metaphor repository ready at {}",
        adjustment.metaphor_dir().display()
    );
    Ok(())
}
