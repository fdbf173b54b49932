//! In-process fakes for the git and process seams, shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::git::GitOperations;
use crate::process::{CommandOutput, CommandRunner};

/// Emulates `sed -i s/TOKEN/VALUE/ FILE`: first match on each line.
pub struct FakeSed;

impl CommandRunner for FakeSed {
    fn run(&self, command: &str, args: &[&str]) -> Result<CommandOutput> {
        let fail = |stderr: String| Error::Command {
            command: command.to_string(),
            stderr,
        };
        let [flag, pattern, file] = args else {
            return Err(fail(format!("unexpected arguments {:?}", args)));
        };
        if *flag != "-i" {
            return Err(fail(format!("expected -i, got {}", flag)));
        }
        let (token, value) = pattern
            .strip_prefix("s/")
            .and_then(|p| p.strip_suffix('/'))
            .and_then(|p| p.split_once('/'))
            .ok_or_else(|| fail(format!("bad pattern {}", pattern)))?;

        let content = fs::read_to_string(file).map_err(|e| fail(format!("{}: {}", file, e)))?;
        let replaced: Vec<String> = content
            .split('\n')
            .map(|line| line.replacen(token, value, 1))
            .collect();
        fs::write(file, replaced.join("\n")).map_err(|e| fail(e.to_string()))?;
        Ok(CommandOutput::default())
    }
}

/// Records every git call; optionally fails the named operation.
#[derive(Default)]
pub struct RecordingGit {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl RecordingGit {
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(operation),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, repo: &Path, detail: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {} {}", operation, repo.display(), detail).trim_end().to_string());
        if self.fail_on == Some(operation) {
            return Err(match operation {
                "remove_branch_reference" => Error::BranchReference {
                    reference: format!("refs/heads/{}", detail),
                    message: "reference not found".to_string(),
                },
                "create_remote" => Error::Remote {
                    url: detail.to_string(),
                    message: "remote origin already exists".to_string(),
                },
                _ => Error::GitCommand {
                    command: operation.to_string(),
                    path: repo.display().to_string(),
                    stderr: "injected failure".to_string(),
                },
            });
        }
        Ok(())
    }
}

impl GitOperations for RecordingGit {
    fn init(&self, path: &Path) -> Result<()> {
        self.record("init", path, "")?;
        fs::create_dir_all(path.join(".git"))?;
        Ok(())
    }

    fn commit_all(&self, repo: &Path, message: &str) -> Result<()> {
        self.record("commit_all", repo, message)
    }

    fn set_main_branch(&self, repo: &Path) -> Result<()> {
        self.record("set_main_branch", repo, "")
    }

    fn remove_branch_reference(&self, repo: &Path, branch: &str) -> Result<()> {
        self.record("remove_branch_reference", repo, branch)
    }

    fn create_remote(&self, repo: &Path, _name: &str, urls: &[String]) -> Result<()> {
        self.record("create_remote", repo, &urls.join(","))
    }
}

/// Writes `content` to `root/relative`, creating parents.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
