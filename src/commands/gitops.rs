//! # Gitops Command Implementation
//!
//! Runs the gitops selector/pruner on an existing template tree.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use gitops_bootstrap::config::{GitProvider, Settings, LOCAL_CLOUD_PROVIDER};
use gitops_bootstrap::phases::gitops::GitopsAdjustment;
use gitops_bootstrap::provisioner::Provisioner;

/// Reduce a gitops template tree to one provider variant and cluster
#[derive(Args, Debug)]
pub struct GitopsArgs {
    /// Gitops template tree to transform in place
    #[arg(long, value_name = "PATH")]
    pub gitops_dir: PathBuf,

    /// Name of the gitops repository written into repos.tf
    #[arg(long, default_value = "gitops")]
    pub gitops_repo_name: String,

    /// Cloud provider of the selected variant
    #[arg(long, default_value = LOCAL_CLOUD_PROVIDER)]
    pub cloud_provider: String,

    /// Git provider of the selected variant (github, gitlab)
    #[arg(long, default_value = "github")]
    pub git_provider: String,

    /// Cluster name; selected cluster-type content lands in registry/<name>
    #[arg(long, default_value = "kubefirst")]
    pub cluster_name: String,

    /// Cluster type to keep from cluster-types/
    #[arg(long, default_value = "mgmt")]
    pub cluster_type: String,

    /// Remove the Atlantis manifest from the registry
    #[arg(long)]
    pub remove_atlantis: bool,

    /// Print the steps without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl GitopsArgs {
    pub fn adjustment(&self) -> GitopsAdjustment {
        GitopsAdjustment {
            cloud_provider: self.cloud_provider.clone(),
            cluster_name: self.cluster_name.clone(),
            cluster_type: self.cluster_type.clone(),
            gitops_repo_dir: self.gitops_dir.clone(),
            gitops_repo_name: self.gitops_repo_name.clone(),
            git_provider: GitProvider::from(self.git_provider.as_str()),
            base_dir: self
                .gitops_dir
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| self.gitops_dir.clone()),
            remove_atlantis: self.remove_atlantis,
        }
    }
}

/// Execute the `gitops` command.
pub fn execute(args: GitopsArgs, settings: &Settings) -> Result<()> {
    let provisioner = Provisioner::new(settings);
    let adjustment = args.adjustment();

    if args.dry_run {
        super::print_plan(&provisioner.gitops_plan(&adjustment));
        return Ok(());
    }

    provisioner.adjust_gitops_repo(&adjustment)?;
    println!("✅ Gitops repository ready at {}", args.gitops_dir.display());
    Ok(())
}
