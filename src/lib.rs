//! # GitOps Bootstrap Library
//!
//! This library turns a generic gitops template tree into the repositories a
//! local k3d platform is bootstrapped from: a gitops repository specific to
//! one cloud provider, git provider and cluster, and a separate "metaphor"
//! sample application repository with a single initial commit.
//!
//! ## Quick Example
//!
//! ```no_run
//! use gitops_bootstrap::config::{self, GitProtocol, GitProvider, ProvisionConfig, RepoNames};
//! use gitops_bootstrap::phases::orchestrator::{bootstrap, ClusterSelection};
//! use gitops_bootstrap::provisioner::Provisioner;
//!
//! let names = RepoNames {
//!     config_name: "local".to_string(),
//!     cluster_name: "kubefirst".to_string(),
//!     gitops_repo_name: "gitops".to_string(),
//!     metaphor_repo_name: "metaphor".to_string(),
//!     git_provider: GitProvider::Github,
//!     git_owner: "acme".to_string(),
//!     git_protocol: GitProtocol::Ssh,
//! };
//! let config = ProvisionConfig::from_home(&names).unwrap();
//! let provisioner = Provisioner::new(&config::Settings::default());
//! let selection = ClusterSelection {
//!     cloud_provider: config::LOCAL_CLOUD_PROVIDER.to_string(),
//!     cluster_type: "mgmt".to_string(),
//!     remove_atlantis: false,
//! };
//! bootstrap(&provisioner, &config, &selection).unwrap();
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the target repository record derived from
//!   a few names, the supported platform variants, and optional settings.
//! - **Filesystem (`filesystem`)**: filtered recursive copy and idempotent
//!   deletion on the host filesystem.
//! - **Plans (`plan`)**: every phase is an ordered list of steps that runs
//!   front to back and stops at the first failure.
//! - **Phases (`phases`)**: the gitops selector/pruner and the metaphor
//!   assembler, plus an orchestrator running both.
//! - **Collaborators (`git`, `process`, `detokenize`)**: the version-control
//!   client and the external stream editor, each behind a trait.
//! - **Provisioner (`provisioner`)**: wires collaborators and runs phases.
//!
//! Nothing here is transactional. A failed run leaves the tree partly
//! transformed; start again from a fresh template.

pub mod config;
pub mod detokenize;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod phases;
pub mod plan;
pub mod process;
pub mod provisioner;

#[cfg(test)]
mod filesystem_proptest;
#[cfg(test)]
mod test_support;
