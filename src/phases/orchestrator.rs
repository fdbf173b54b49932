//! Orchestrator for a complete bootstrap
//!
//! Derives the inputs of both phases from one [`ProvisionConfig`] and runs
//! them back to back.

use log::info;

use super::gitops::GitopsAdjustment;
use super::metaphor::MetaphorAdjustment;
use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::provisioner::Provisioner;

/// Cluster choices that are not part of the target repository record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSelection {
    pub cloud_provider: String,
    pub cluster_type: String,
    pub remove_atlantis: bool,
}

/// Phase 1 inputs for `config`.
pub fn gitops_adjustment(config: &ProvisionConfig, selection: &ClusterSelection) -> GitopsAdjustment {
    GitopsAdjustment {
        cloud_provider: selection.cloud_provider.clone(),
        cluster_name: config.cluster_name.clone(),
        cluster_type: selection.cluster_type.clone(),
        gitops_repo_dir: config.gitops_dir.clone(),
        gitops_repo_name: config.gitops_repo_name.clone(),
        git_provider: config.git_provider.clone(),
        base_dir: config.k1_dir.clone(),
        remove_atlantis: selection.remove_atlantis,
    }
}

/// Phase 2 inputs for `config`. The metaphor repository is created next to
/// the gitops tree and points at the URL matching the configured protocol.
pub fn metaphor_adjustment(config: &ProvisionConfig) -> MetaphorAdjustment {
    MetaphorAdjustment {
        destination_metaphor_repo_git_url: config.destination_metaphor_url().to_string(),
        gitops_repo_dir: config.gitops_dir.clone(),
        metaphor_repo_name: config.metaphor_repo_name.clone(),
        git_provider: config.git_provider.clone(),
        base_dir: config.k1_dir.clone(),
    }
}

/// Execute the complete bootstrap (Phases 1-2)
///
/// Stops at the first failure; the tree is then left as the last
/// successful step produced it.
pub fn bootstrap(
    provisioner: &Provisioner,
    config: &ProvisionConfig,
    selection: &ClusterSelection,
) -> Result<()> {
    // Phase 1: Gitops Tree Selection
    provisioner.adjust_gitops_repo(&gitops_adjustment(config, selection))?;

    // Phase 2: Metaphor Assembly
    provisioner.adjust_metaphor_repo(&metaphor_adjustment(config))?;

    info!(
        "bootstrap complete: gitops at {}, metaphor at {}",
        config.gitops_dir.display(),
        config.metaphor_dir.display()
    );
    Ok(())
}
