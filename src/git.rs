//! Version-control client used to create the metaphor repository.
//!
//! `SystemGit` drives the system `git` binary, so whatever identity and
//! transport configuration the user has is picked up unchanged. Commits are
//! made with an explicit identity so a fresh machine without `user.name`
//! still works.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::config::CommitIdentity;
use crate::error::{Error, Result};

/// Branch the metaphor repository ends up on.
pub const MAIN_BRANCH: &str = "main";
/// Branch a freshly initialized repository starts on.
pub const LEGACY_BRANCH: &str = "master";

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Initializes an empty repository at `path`. Fails when `path` already
    /// holds a repository.
    fn init(&self, path: &Path) -> Result<()>;

    /// Stages everything in the work tree and records a single commit.
    fn commit_all(&self, repo: &Path, message: &str) -> Result<()>;

    /// Points `main` at the current commit and moves HEAD onto it.
    fn set_main_branch(&self, repo: &Path) -> Result<()>;

    /// Deletes the local branch reference `branch`. A missing reference is
    /// reported as `Error::BranchReference`.
    fn remove_branch_reference(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Adds a remote named `name` with the given URLs.
    fn create_remote(&self, repo: &Path, name: &str, urls: &[String]) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    identity: CommitIdentity,
}

impl SystemGit {
    pub fn new(identity: CommitIdentity) -> Self {
        Self { identity }
    }

    fn output(&self, repo: &Path, args: &[&str]) -> Result<std::process::Output> {
        debug!("git -C {} {}", repo.display(), args.join(" "));
        Command::new("git")
            .arg("-C")
            .arg(repo)
            .args(args)
            .output()
            .map_err(|e| Error::GitCommand {
                command: args.join(" "),
                path: repo.display().to_string(),
                stderr: e.to_string(),
            })
    }

    fn run_checked(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = self.output(repo, args)?;
        if !output.status.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                path: repo.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl GitOperations for SystemGit {
    fn init(&self, path: &Path) -> Result<()> {
        if path.join(".git").exists() {
            return Err(Error::GitCommand {
                command: "init".to_string(),
                path: path.display().to_string(),
                stderr: "repository already exists".to_string(),
            });
        }
        self.run_checked(path, &["init", "--quiet"])?;
        let head = format!("refs/heads/{}", LEGACY_BRANCH);
        self.run_checked(path, &["symbolic-ref", "HEAD", &head])?;
        Ok(())
    }

    fn commit_all(&self, repo: &Path, message: &str) -> Result<()> {
        self.run_checked(repo, &["add", "--all"])?;
        let name = format!("user.name={}", self.identity.name);
        let email = format!("user.email={}", self.identity.email);
        self.run_checked(
            repo,
            &[
                "-c",
                &name,
                "-c",
                &email,
                "-c",
                "commit.gpgsign=false",
                "commit",
                "--quiet",
                "--message",
                message,
            ],
        )?;
        Ok(())
    }

    fn set_main_branch(&self, repo: &Path) -> Result<()> {
        let main = format!("refs/heads/{}", MAIN_BRANCH);
        self.run_checked(repo, &["update-ref", &main, "HEAD"])?;
        self.run_checked(repo, &["symbolic-ref", "HEAD", &main])?;
        Ok(())
    }

    fn remove_branch_reference(&self, repo: &Path, branch: &str) -> Result<()> {
        let reference = format!("refs/heads/{}", branch);
        let exists = self
            .output(repo, &["show-ref", "--verify", "--quiet", &reference])?
            .status
            .success();
        if !exists {
            return Err(Error::BranchReference {
                reference,
                message: "reference not found".to_string(),
            });
        }

        self.run_checked(repo, &["update-ref", "-d", &reference])
            .map_err(|e| Error::BranchReference {
                reference: reference.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn create_remote(&self, repo: &Path, name: &str, urls: &[String]) -> Result<()> {
        let remote_error = |message: String| Error::Remote {
            url: urls.join(","),
            message,
        };

        let (first, rest) = urls
            .split_first()
            .ok_or_else(|| remote_error("no URL given".to_string()))?;

        self.run_checked(repo, &["remote", "add", name, first])
            .map_err(|e| remote_error(e.to_string()))?;
        for url in rest {
            self.run_checked(repo, &["remote", "set-url", "--add", name, url])
                .map_err(|e| remote_error(e.to_string()))?;
        }
        Ok(())
    }
}
