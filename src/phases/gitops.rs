//! Phase 1: Gitops Tree Selection and Pruning
//!
//! Turns the generic gitops template tree into the repository for one
//! cloud provider, git provider and cluster.
//!
//! ## Process
//!
//! 1.  **Drop other variants**: every supported `{cloud}-{git}` directory
//!     except the selected one is deleted.
//! 2.  **Promote the variant**: the selected variant is copied over the
//!     tree root and then deleted.
//! 3.  **Register the cluster**: `cluster-types/{type}` is copied into
//!     `registry/{cluster}`; `cluster-types` and `services` are deleted.
//! 4.  **Pick the console manifest**: ARM64 hosts running the local cloud
//!     provider keep `console-arm.yaml`, every other combination keeps
//!     `console.yaml`.
//! 5.  **Optional Atlantis removal**.
//! 6.  **Repository definitions**: `repos.tf` is materialized from its
//!     template and the gitops repository name is filled in.

use std::path::{Path, PathBuf};

use crate::config::{variant_name, GitProvider, PlatformSet, LOCAL_CLOUD_PROVIDER};
use crate::detokenize::GITOPS_REPO_NAME_TOKEN;
use crate::plan::{Plan, Step};

/// Path of the repository-definition file inside the gitops tree.
pub const REPOS_TF: &str = "terraform/github/repos.tf";
/// Template the repository-definition file is materialized from.
pub const REPOS_TF_TEMPLATE: &str = "terraform/github/repos.tf.tmpl";

const CONSOLE_MANIFEST: &str = "components/kubefirst/console.yaml";
const CONSOLE_ARM_MANIFEST: &str = "components/kubefirst/console-arm.yaml";
const ATLANTIS_MANIFEST: &str = "atlantis.yaml";

/// Inputs for adjusting a gitops template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitopsAdjustment {
    pub cloud_provider: String,
    pub cluster_name: String,
    pub cluster_type: String,
    pub gitops_repo_dir: PathBuf,
    pub gitops_repo_name: String,
    pub git_provider: GitProvider,
    /// Bootstrap base directory. Not read by this phase.
    pub base_dir: PathBuf,
    pub remove_atlantis: bool,
}

impl GitopsAdjustment {
    /// Name of the selected `{cloud}-{git}` variant directory.
    pub fn variant(&self) -> String {
        variant_name(&self.cloud_provider, &self.git_provider)
    }

    /// Destination of the selected cluster-type content.
    pub fn registry_dir(&self) -> PathBuf {
        self.gitops_repo_dir.join("registry").join(&self.cluster_name)
    }
}

/// Console manifest (relative to the registry directory) that must be
/// deleted for this host and provider.
pub fn console_manifest_to_remove(host_arch: &str, cloud_provider: &str) -> &'static str {
    if host_arch == "arm64" && cloud_provider == LOCAL_CLOUD_PROVIDER {
        CONSOLE_MANIFEST
    } else {
        CONSOLE_ARM_MANIFEST
    }
}

/// Build the ordered steps that adjust the gitops tree.
pub fn plan(adjustment: &GitopsAdjustment, platforms: &PlatformSet, host_arch: &str) -> Plan {
    let root: &Path = &adjustment.gitops_repo_dir;
    let variant = adjustment.variant();
    let registry = adjustment.registry_dir();
    let mut plan = Plan::new("gitops");

    for other in platforms.others(&variant) {
        plan.push(Step::Remove(root.join(other)));
    }

    let variant_dir = root.join(&variant);
    plan.push(Step::Copy {
        from: variant_dir.clone(),
        to: root.to_path_buf(),
    });
    plan.push(Step::Remove(variant_dir));

    plan.push(Step::Copy {
        from: root.join("cluster-types").join(&adjustment.cluster_type),
        to: registry.clone(),
    });
    plan.push(Step::Remove(root.join("cluster-types")));
    plan.push(Step::Remove(root.join("services")));

    plan.push(Step::Remove(registry.join(console_manifest_to_remove(
        host_arch,
        &adjustment.cloud_provider,
    ))));

    if adjustment.remove_atlantis {
        plan.push(Step::Remove(registry.join(ATLANTIS_MANIFEST)));
    }

    let repos_tf = root.join(REPOS_TF);
    plan.push(Step::Copy {
        from: root.join(REPOS_TF_TEMPLATE),
        to: repos_tf.clone(),
    });
    plan.push(Step::Detokenize {
        file: repos_tf,
        token: GITOPS_REPO_NAME_TOKEN.to_string(),
        value: adjustment.gitops_repo_name.clone(),
    });

    plan
}
