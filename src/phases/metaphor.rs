//! Phase 2: Metaphor Repository Assembly
//!
//! Extracts the sample application out of the pruned gitops tree into its
//! own freshly initialized repository.
//!
//! The repository moves through `absent → initialized → populated →
//! committed → branch-normalized → remote-attached`. Each transition is a
//! plan step; a failure leaves the repository in the last state reached.

use std::path::PathBuf;

use log::warn;

use crate::config::GitProvider;
use crate::detokenize::METAPHOR_REPO_NAME_TOKEN;
use crate::git::LEGACY_BRANCH;
use crate::phases::gitops::REPOS_TF;
use crate::plan::{Plan, Step};

/// Message of the single commit in a new metaphor repository.
pub const INITIAL_COMMIT_MESSAGE: &str = "committing initial detokenized metaphor repo content";
/// Remote the destination URL is attached as.
pub const REMOTE_NAME: &str = "origin";

/// Inputs for assembling the metaphor repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaphorAdjustment {
    pub destination_metaphor_repo_git_url: String,
    pub gitops_repo_dir: PathBuf,
    pub metaphor_repo_name: String,
    pub git_provider: GitProvider,
    /// Directory the metaphor repository is created under.
    pub base_dir: PathBuf,
}

impl MetaphorAdjustment {
    pub fn metaphor_dir(&self) -> PathBuf {
        self.base_dir.join("metaphor")
    }
}

/// Build the ordered steps that assemble the metaphor repository.
pub fn plan(adjustment: &MetaphorAdjustment) -> Plan {
    let gitops = &adjustment.gitops_repo_dir;
    let ci = gitops.join("ci");
    let repo = adjustment.metaphor_dir();
    let mut plan = Plan::new("metaphor");

    plan.push(Step::CreateDir(repo.clone()));
    plan.push(Step::GitInit(repo.clone()));
    plan.push(Step::Copy {
        from: gitops.join("metaphor"),
        to: repo.clone(),
    });

    match &adjustment.git_provider {
        GitProvider::Github => plan.push(Step::Copy {
            from: ci.join(".github"),
            to: repo.join(".github"),
        }),
        GitProvider::Gitlab => plan.push(Step::Copy {
            from: ci.join(".gitlab-ci.yml"),
            to: repo.join(".gitlab-ci.yml"),
        }),
        GitProvider::Other(name) => {
            warn!("no CI content available for git provider {}, skipping", name);
        }
    }

    plan.push(Step::Copy {
        from: ci.join(".argo"),
        to: repo.join(".argo"),
    });

    plan.push(Step::CreateDir(repo.join("build")));
    plan.push(Step::Copy {
        from: repo.join("Dockerfile"),
        to: repo.join("build").join("Dockerfile"),
    });

    plan.push(Step::Remove(ci));
    plan.push(Step::Remove(gitops.join("metaphor")));

    plan.push(Step::GitCommit {
        repo: repo.clone(),
        message: INITIAL_COMMIT_MESSAGE.to_string(),
    });
    plan.push(Step::SetMainBranch(repo.clone()));
    plan.push(Step::RemoveBranchReference {
        repo: repo.clone(),
        branch: LEGACY_BRANCH.to_string(),
    });

    plan.push(Step::Detokenize {
        file: gitops.join(REPOS_TF),
        token: METAPHOR_REPO_NAME_TOKEN.to_string(),
        value: adjustment.metaphor_repo_name.clone(),
    });

    plan.push(Step::CreateRemote {
        repo,
        name: REMOTE_NAME.to_string(),
        url: adjustment.destination_metaphor_repo_git_url.clone(),
    });

    plan
}
