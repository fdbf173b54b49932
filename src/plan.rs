//! Ordered, inspectable lists of bootstrap actions.
//!
//! Both bootstrap components first describe what they will do as a [`Plan`]
//! of [`Step`]s and only then execute it. A plan runs front to back and
//! stops at the first failing step, returning `Error::Step` with the step's
//! index. Nothing is rolled back: the tree is left as the last successful
//! step produced it.

use std::fmt;
use std::path::PathBuf;

use log::{error, info};

use crate::detokenize;
use crate::error::{Error, Result};
use crate::filesystem;
use crate::git::GitOperations;
use crate::process::CommandRunner;

/// One filesystem, subprocess or version-control action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Delete a file or directory tree; a missing path is fine.
    Remove(PathBuf),
    /// Recursively copy through the copy filter, merging into `to`.
    Copy { from: PathBuf, to: PathBuf },
    /// Create a directory and any missing parents.
    CreateDir(PathBuf),
    /// Replace `token` with the quoted `value` in `file`.
    Detokenize {
        file: PathBuf,
        token: String,
        value: String,
    },
    GitInit(PathBuf),
    GitCommit { repo: PathBuf, message: String },
    SetMainBranch(PathBuf),
    RemoveBranchReference { repo: PathBuf, branch: String },
    CreateRemote {
        repo: PathBuf,
        name: String,
        url: String,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Remove(path) => write!(f, "remove {}", path.display()),
            Step::Copy { from, to } => write!(f, "copy {} -> {}", from.display(), to.display()),
            Step::CreateDir(path) => write!(f, "create directory {}", path.display()),
            Step::Detokenize { file, token, value } => {
                write!(f, "replace {} with \"{}\" in {}", token, value, file.display())
            }
            Step::GitInit(path) => write!(f, "git init {}", path.display()),
            Step::GitCommit { repo, message } => {
                write!(f, "git commit in {}: {}", repo.display(), message)
            }
            Step::SetMainBranch(repo) => write!(f, "set main branch in {}", repo.display()),
            Step::RemoveBranchReference { repo, branch } => {
                write!(f, "remove branch {} in {}", branch, repo.display())
            }
            Step::CreateRemote { repo, name, url } => {
                write!(f, "add remote {} {} in {}", name, url, repo.display())
            }
        }
    }
}

/// Collaborators a plan needs to execute.
#[derive(Clone, Copy)]
pub struct Toolbox<'a> {
    pub git: &'a dyn GitOperations,
    pub runner: &'a dyn CommandRunner,
    /// Stream editor binary used for detokenizing.
    pub editor: &'a str,
}

impl Step {
    /// Perform this step.
    pub fn run(&self, tools: &Toolbox<'_>) -> Result<()> {
        match self {
            Step::Remove(path) => filesystem::remove_all(path),
            Step::Copy { from, to } => filesystem::copy_tree(from, to, filesystem::should_skip),
            Step::CreateDir(path) => filesystem::create_private_dir(path),
            Step::Detokenize { file, token, value } => {
                detokenize::substitute_in_place(tools.runner, tools.editor, file, token, value)
            }
            Step::GitInit(path) => tools.git.init(path),
            Step::GitCommit { repo, message } => tools.git.commit_all(repo, message),
            Step::SetMainBranch(repo) => tools.git.set_main_branch(repo),
            Step::RemoveBranchReference { repo, branch } => {
                tools.git.remove_branch_reference(repo, branch)
            }
            Step::CreateRemote { repo, name, url } => {
                tools.git.create_remote(repo, name, std::slice::from_ref(url))
            }
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    name: String,
    steps: Vec<Step>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Mutable access to the steps, for callers that adjust a plan before
    /// running it.
    pub fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute(&self, tools: &Toolbox<'_>) -> Result<()> {
        let total = self.steps.len();
        for (index, step) in self.steps.iter().enumerate() {
            info!("{} [{}/{}]: {}", self.name, index + 1, total, step);
            if let Err(e) = step.run(tools) {
                error!("{} failed at step {} ({}): {}", self.name, index + 1, step, e);
                return Err(Error::Step {
                    index,
                    step: step.to_string(),
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeSed, RecordingGit};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_step_display() {
        let step = Step::Copy {
            from: PathBuf::from("/g/k3d-github"),
            to: PathBuf::from("/g"),
        };
        assert_eq!(step.to_string(), "copy /g/k3d-github -> /g");

        let step = Step::Detokenize {
            file: PathBuf::from("repos.tf"),
            token: "GITOPS_REPO_NAME".to_string(),
            value: "gitops".to_string(),
        };
        assert_eq!(step.to_string(), "replace GITOPS_REPO_NAME with \"gitops\" in repos.tf");
    }

    #[test]
    fn test_execute_runs_steps_in_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/file.txt"), "NAME").unwrap();

        let mut plan = Plan::new("test");
        plan.push(Step::Copy {
            from: root.join("a"),
            to: root.join("b"),
        });
        plan.push(Step::Remove(root.join("a")));
        plan.push(Step::Detokenize {
            file: root.join("b/file.txt"),
            token: "NAME".to_string(),
            value: "x".to_string(),
        });

        let git = RecordingGit::default();
        let sed = FakeSed;
        plan.execute(&Toolbox {
            git: &git,
            runner: &sed,
            editor: "sed",
        })
        .unwrap();

        assert!(!root.join("a").exists());
        assert_eq!(fs::read_to_string(root.join("b/file.txt")).unwrap(), "\"x\"");
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("keep")).unwrap();

        let mut plan = Plan::new("test");
        plan.push(Step::CreateDir(root.join("first")));
        plan.push(Step::Copy {
            from: root.join("missing"),
            to: root.join("dst"),
        });
        plan.push(Step::Remove(root.join("keep")));
        plan.push(Step::GitInit(root.join("first")));

        let git = RecordingGit::default();
        let err = plan
            .execute(&Toolbox {
                git: &git,
                runner: &FakeSed,
                editor: "sed",
            })
            .unwrap_err();

        match &err {
            Error::Step { index, step, .. } => {
                assert_eq!(*index, 1);
                assert!(step.starts_with("copy "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root(), Error::Filesystem { .. }));
        assert!(root.join("first").is_dir());
        assert!(root.join("keep").is_dir());
        assert!(git.calls().is_empty());
    }

    #[test]
    fn test_empty_plan_succeeds() {
        let plan = Plan::new("empty");
        assert!(plan.is_empty());
        plan.execute(&Toolbox {
            git: &RecordingGit::default(),
            runner: &FakeSed,
            editor: "sed",
        })
        .unwrap();
    }
}
