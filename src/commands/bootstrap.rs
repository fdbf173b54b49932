//! # Bootstrap Command Implementation
//!
//! Derives the target repository record from a few names and runs both
//! phases against `~/.k1/configs/<config-name>/gitops`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use gitops_bootstrap::config::{
    GitProtocol, GitProvider, ProvisionConfig, RepoNames, Settings, LOCAL_CLOUD_PROVIDER,
};
use gitops_bootstrap::phases::orchestrator::{self, ClusterSelection};
use gitops_bootstrap::provisioner::Provisioner;

/// Run both phases for a named configuration
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Configuration name under ~/.k1/configs
    #[arg(long, default_value = "kubefirst")]
    pub config_name: String,

    /// Cluster name
    #[arg(long, default_value = "kubefirst")]
    pub cluster_name: String,

    /// Cluster type to keep from cluster-types/
    #[arg(long, default_value = "mgmt")]
    pub cluster_type: String,

    /// Git provider (github, gitlab)
    #[arg(long, default_value = "github")]
    pub git_provider: String,

    /// Owner (user or organization) of the destination repositories
    #[arg(long)]
    pub git_owner: String,

    /// Protocol of the metaphor remote URL (ssh, https)
    #[arg(long, default_value = "ssh")]
    pub git_protocol: String,

    #[arg(long, default_value = "gitops")]
    pub gitops_repo_name: String,

    #[arg(long, default_value = "metaphor")]
    pub metaphor_repo_name: String,

    /// Remove the Atlantis manifest from the registry
    #[arg(long)]
    pub remove_atlantis: bool,

    /// Home directory to resolve ~/.k1 against
    #[arg(long, value_name = "PATH")]
    pub home: Option<PathBuf>,
}

impl BootstrapArgs {
    fn names(&self) -> Result<RepoNames> {
        Ok(RepoNames {
            config_name: self.config_name.clone(),
            cluster_name: self.cluster_name.clone(),
            gitops_repo_name: self.gitops_repo_name.clone(),
            metaphor_repo_name: self.metaphor_repo_name.clone(),
            git_provider: GitProvider::from(self.git_provider.as_str()),
            git_owner: self.git_owner.clone(),
            git_protocol: self.git_protocol.parse::<GitProtocol>()?,
        })
    }
}

/// Execute the `bootstrap` command.
pub fn execute(args: BootstrapArgs, settings: &Settings) -> Result<()> {
    let names = args.names()?;
    let config = match &args.home {
        Some(home) => ProvisionConfig::new(&names, home),
        None => ProvisionConfig::from_home(&names)?,
    };

    if !config.gitops_dir.is_dir() {
        anyhow::bail!(
            "Gitops template tree not found: {}",
            config.gitops_dir.display()
        );
    }

    let selection = ClusterSelection {
        cloud_provider: LOCAL_CLOUD_PROVIDER.to_string(),
        cluster_type: args.cluster_type.clone(),
        remove_atlantis: args.remove_atlantis,
    };

    let provisioner = Provisioner::new(settings);
    orchestrator::bootstrap(&provisioner, &config, &selection)?;

    println!("✅ Bootstrap complete");
    println!("   gitops:   {}", config.gitops_dir.display());
    println!(
        "   metaphor: {} -> {}",
        config.metaphor_dir.display(),
        config.destination_metaphor_url()
    );
    Ok(())
}
