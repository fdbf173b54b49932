//! # Provisioner
//!
//! `Provisioner` is the entry point for the two bootstrap components. It
//! owns the collaborators the components delegate to and the run-wide
//! inputs that are not part of a single call:
//!
//! - **`GitOperations`**: the version-control client.
//! - **`CommandRunner`**: the process helper used for detokenizing.
//! - **`PlatformSet`**: the supported `{cloud}-{git}` variants.
//! - **host architecture**: decides which console manifest survives.
//!
//! `Provisioner::new` wires the real `git` and `sed` binaries and the host
//! architecture. `Provisioner::with_operations` accepts replacements, which
//! is how tests run the components against fakes and synthetic platform
//! sets.

use log::info;

use crate::config::{self, PlatformSet, Settings};
use crate::error::Result;
use crate::git::{GitOperations, SystemGit};
use crate::phases::gitops::{self, GitopsAdjustment};
use crate::phases::metaphor::{self, MetaphorAdjustment};
use crate::plan::{Plan, Toolbox};
use crate::process::{CommandRunner, SystemRunner};

/// Runs the gitops and metaphor components against injected collaborators.
pub struct Provisioner {
    git_ops: Box<dyn GitOperations>,
    runner: Box<dyn CommandRunner>,
    platforms: PlatformSet,
    host_arch: String,
    editor: String,
}

impl Provisioner {
    /// Creates a `Provisioner` backed by the system `git` and stream editor.
    pub fn new(settings: &Settings) -> Self {
        Self {
            git_ops: Box::new(SystemGit::new(settings.commit_author.clone())),
            runner: Box::new(SystemRunner),
            platforms: settings.supported_platforms.clone(),
            host_arch: config::host_arch(),
            editor: settings.substitution_command.clone(),
        }
    }

    /// Creates a `Provisioner` with custom collaborators.
    pub fn with_operations(
        git_ops: Box<dyn GitOperations>,
        runner: Box<dyn CommandRunner>,
        platforms: PlatformSet,
        host_arch: impl Into<String>,
    ) -> Self {
        Self {
            git_ops,
            runner,
            platforms,
            host_arch: host_arch.into(),
            editor: "sed".to_string(),
        }
    }

    /// Overrides the stream editor binary.
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = editor.into();
        self
    }

    pub fn platforms(&self) -> &PlatformSet {
        &self.platforms
    }

    pub fn host_arch(&self) -> &str {
        &self.host_arch
    }

    /// The steps `adjust_gitops_repo` would run, without running them.
    pub fn gitops_plan(&self, adjustment: &GitopsAdjustment) -> Plan {
        gitops::plan(adjustment, &self.platforms, &self.host_arch)
    }

    /// The steps `adjust_metaphor_repo` would run, without running them.
    pub fn metaphor_plan(&self, adjustment: &MetaphorAdjustment) -> Plan {
        metaphor::plan(adjustment)
    }

    /// Reduce the gitops template tree to the selected variant and cluster.
    pub fn adjust_gitops_repo(&self, adjustment: &GitopsAdjustment) -> Result<()> {
        info!(
            "adjusting gitops repository {} for {} cluster {}",
            adjustment.gitops_repo_dir.display(),
            adjustment.variant(),
            adjustment.cluster_name
        );
        self.execute(&self.gitops_plan(adjustment))
    }

    /// Assemble the metaphor repository out of the pruned gitops tree.
    pub fn adjust_metaphor_repo(&self, adjustment: &MetaphorAdjustment) -> Result<()> {
        info!(
            "assembling metaphor repository {} for {}",
            adjustment.metaphor_dir().display(),
            adjustment.destination_metaphor_repo_git_url
        );
        self.execute(&self.metaphor_plan(adjustment))
    }

    /// Run an arbitrary plan with this provisioner's collaborators.
    pub fn execute(&self, plan: &Plan) -> Result<()> {
        plan.execute(&Toolbox {
            git: self.git_ops.as_ref(),
            runner: self.runner.as_ref(),
            editor: &self.editor,
        })
    }
}
