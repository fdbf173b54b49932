//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TemplateFixture::new().with_standard_template();
//! ```

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use gitops_bootstrap::error::{Error, Result};
use gitops_bootstrap::git::GitOperations;
use gitops_bootstrap::process::{CommandOutput, CommandRunner};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, tools_available, CallLog, InProcessSed, RecordingGit, TemplateFixture};
}

/// Template content shared by the fixtures.
#[allow(dead_code)]
pub mod templates {
    pub const REPOS_TF_TMPL: &str = r#"module "gitops" {
  repo_name = GITOPS_REPO_NAME
}

module "metaphor" {
  repo_name = METAPHOR_REPO_NAME
}
"#;
}

/// Returns `true` when both `git` and `sed` can be spawned.
#[allow(dead_code)]
pub fn tools_available() -> bool {
    ["git", "sed"].iter().all(|tool| {
        Command::new(tool)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// Run `git -C repo args...` and return trimmed stdout.
#[allow(dead_code)]
pub fn git(repo: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .expect("Failed to run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding a gitops template tree.
#[allow(dead_code)]
pub struct TemplateFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TemplateFixture {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("gitops")
            .create_dir_all()
            .expect("Failed to create gitops directory");
        Self { temp_dir }
    }

    /// Add a file under the gitops tree.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("gitops")
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Variants `k3d-github` and `aws-gitlab`, cluster types `local` and
    /// `production`, plus metaphor, CI and legacy services content.
    pub fn with_standard_template(self) -> Self {
        self.with_file("k3d-github/terraform/github/repos.tf.tmpl", templates::REPOS_TF_TMPL)
            .with_file("k3d-github/terraform/github/main.tf", "provider \"github\" {}\n")
            .with_file("k3d-github/terraform/.terraform/terraform.tfstate", "{}")
            .with_file("k3d-github/argo-workflows/values.yaml", "k3d: true\n")
            .with_file("aws-gitlab/terraform/gitlab/main.tf", "provider \"gitlab\" {}\n")
            .with_file("cluster-types/local/argocd.yaml", "cluster: local\n")
            .with_file("cluster-types/local/atlantis.yaml", "kind: Application\n")
            .with_file(
                "cluster-types/local/components/kubefirst/console.yaml",
                "image: console:amd64\n",
            )
            .with_file(
                "cluster-types/local/components/kubefirst/console-arm.yaml",
                "image: console:arm64\n",
            )
            .with_file("cluster-types/production/argocd.yaml", "cluster: production\n")
            .with_file("services/legacy.yaml", "legacy: true\n")
            .with_file("metaphor/Dockerfile", "FROM node:18-alpine\n")
            .with_file("metaphor/package.json", "{\"name\": \"metaphor\"}\n")
            .with_file("ci/.github/workflows/main.yaml", "on: push\n")
            .with_file("ci/.gitlab-ci.yml", "stages: [build]\n")
            .with_file("ci/.argo/ci.yaml", "kind: WorkflowTemplate\n")
    }

    /// Root directory; the gitops tree is `root()/gitops`.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path under the fixture root, for `assert_fs` assertions.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn gitops_dir(&self) -> PathBuf {
        self.temp_dir.path().join("gitops")
    }

    pub fn metaphor_dir(&self) -> PathBuf {
        self.temp_dir.path().join("metaphor")
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.gitops_dir().join(path)).expect("Failed to read file")
    }
}

impl Default for TemplateFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Emulates `sed -i s/TOKEN/VALUE/ FILE` in-process.
#[allow(dead_code)]
pub struct InProcessSed;

impl CommandRunner for InProcessSed {
    fn run(&self, command: &str, args: &[&str]) -> Result<CommandOutput> {
        let fail = |stderr: String| Error::Command {
            command: command.to_string(),
            stderr,
        };
        let [_, pattern, file] = args else {
            return Err(fail(format!("unexpected arguments {:?}", args)));
        };
        let (token, value) = pattern
            .strip_prefix("s/")
            .and_then(|p| p.strip_suffix('/'))
            .and_then(|p| p.split_once('/'))
            .ok_or_else(|| fail(format!("bad pattern {}", pattern)))?;
        let content = fs::read_to_string(file).map_err(|e| fail(e.to_string()))?;
        let replaced: Vec<String> = content
            .split('\n')
            .map(|line| line.replacen(token, value, 1))
            .collect();
        fs::write(file, replaced.join("\n")).map_err(|e| fail(e.to_string()))?;
        Ok(CommandOutput::default())
    }
}

/// Shared call log, readable after the git fake has been boxed.
#[allow(dead_code)]
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Records git calls into a shared log instead of running git.
#[allow(dead_code)]
pub struct RecordingGit {
    log: CallLog,
}

#[allow(dead_code)]
impl RecordingGit {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        (Self { log: log.clone() }, log)
    }

    fn record(&self, entry: String) -> Result<()> {
        self.log.lock().unwrap().push(entry);
        Ok(())
    }
}

impl GitOperations for RecordingGit {
    fn init(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path.join(".git"))?;
        self.record("init".to_string())
    }

    fn commit_all(&self, _repo: &Path, message: &str) -> Result<()> {
        self.record(format!("commit {}", message))
    }

    fn set_main_branch(&self, _repo: &Path) -> Result<()> {
        self.record("set_main_branch".to_string())
    }

    fn remove_branch_reference(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.record(format!("remove_branch_reference {}", branch))
    }

    fn create_remote(&self, _repo: &Path, name: &str, urls: &[String]) -> Result<()> {
        self.record(format!("create_remote {} {}", name, urls.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_gitops_dir() {
        let fixture = TemplateFixture::new();
        assert!(fixture.gitops_dir().is_dir());
    }

    #[test]
    fn test_standard_template_has_both_variants() {
        let fixture = TemplateFixture::new().with_standard_template();
        assert!(fixture.gitops_dir().join("k3d-github").is_dir());
        assert!(fixture.gitops_dir().join("aws-gitlab").is_dir());
    }

    #[test]
    fn test_in_process_sed_replaces_first_match_per_line() {
        let fixture = TemplateFixture::new().with_file("f.txt", "A A\nA\n");
        let file = fixture.gitops_dir().join("f.txt");
        let file = file.to_string_lossy();
        InProcessSed.run("sed", &["-i", "s/A/\"b\"/", &file]).unwrap();
        assert_eq!(fixture.read("f.txt"), "\"b\" A\n\"b\"\n");
    }
}
