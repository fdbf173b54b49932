//! # Configuration
//!
//! Two kinds of configuration feed the bootstrap flow:
//!
//! - **`ProvisionConfig`**: the target repository record for one run. It is
//!   derived from a handful of names (configuration, cluster, repositories,
//!   git owner) and the user's home directory, and holds every destination
//!   URL and local path the flow touches.
//! - **`Settings`**: optional knobs loaded from a YAML file, such as the
//!   set of supported `{cloud}-{git}` platform variants, the identity used
//!   for the initial metaphor commit, and the stream editor binary.
//!
//! ## Settings file format
//!
//! ```yaml
//! supported_platforms:
//!   - k3d-github
//!   - k3d-gitlab
//! commit_author:
//!   name: kbot
//!   email: kbot@kubefirst.com
//! substitution_command: sed
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cloud provider of a local k3d cluster.
pub const LOCAL_CLOUD_PROVIDER: &str = "k3d";
/// Domain name served by the local cluster.
pub const DOMAIN_NAME: &str = "kubefirst.dev";
pub const GITHUB_HOST: &str = "github.com";
pub const GITLAB_HOST: &str = "gitlab.com";

const DEFAULT_PLATFORMS: &[&str] = &[
    "aws-github",
    "aws-gitlab",
    "civo-github",
    "civo-gitlab",
    "digitalocean-github",
    "digitalocean-gitlab",
    "google-github",
    "google-gitlab",
    "k3d-github",
    "k3d-gitlab",
    "vultr-github",
    "vultr-gitlab",
];

/// Git hosting provider of the destination repositories.
///
/// Providers other than GitHub and GitLab are carried through as `Other`;
/// they get no CI content in the metaphor repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GitProvider {
    Github,
    Gitlab,
    Other(String),
}

impl GitProvider {
    pub fn as_str(&self) -> &str {
        match self {
            GitProvider::Github => "github",
            GitProvider::Gitlab => "gitlab",
            GitProvider::Other(name) => name,
        }
    }

    /// Hostname of the provider, empty for unknown providers.
    pub fn host(&self) -> &'static str {
        match self {
            GitProvider::Github => GITHUB_HOST,
            GitProvider::Gitlab => GITLAB_HOST,
            GitProvider::Other(_) => "",
        }
    }
}

impl From<&str> for GitProvider {
    fn from(value: &str) -> Self {
        match value {
            "github" => GitProvider::Github,
            "gitlab" => GitProvider::Gitlab,
            other => GitProvider::Other(other.to_string()),
        }
    }
}

impl From<String> for GitProvider {
    fn from(value: String) -> Self {
        GitProvider::from(value.as_str())
    }
}

impl From<GitProvider> for String {
    fn from(value: GitProvider) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol used to talk to the destination repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitProtocol {
    Ssh,
    Https,
}

impl FromStr for GitProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ssh" => Ok(GitProtocol::Ssh),
            "https" => Ok(GitProtocol::Https),
            other => Err(Error::Config {
                message: format!("unsupported git protocol '{}'", other),
                hint: Some("use 'ssh' or 'https'".to_string()),
            }),
        }
    }
}

impl fmt::Display for GitProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitProtocol::Ssh => f.write_str("ssh"),
            GitProtocol::Https => f.write_str("https"),
        }
    }
}

/// Ordered set of supported `{cloudProvider}-{gitProvider}` variant names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PlatformSet {
    names: Vec<String>,
}

impl PlatformSet {
    /// Builds a set from names, keeping first-seen order and dropping
    /// duplicates.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Every variant except `selected`, in set order.
    pub fn others<'a>(&'a self, selected: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |name| *name != selected)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for PlatformSet {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORMS.iter().copied())
    }
}

impl From<Vec<String>> for PlatformSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<PlatformSet> for Vec<String> {
    fn from(value: PlatformSet) -> Self {
        value.names
    }
}

/// Name of the variant directory for a cloud and git provider pair.
pub fn variant_name(cloud_provider: &str, git_provider: &GitProvider) -> String {
    format!("{}-{}", cloud_provider, git_provider)
}

/// Author and committer identity for commits made by the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: "kbot".to_string(),
            email: "kbot@kubefirst.com".to_string(),
        }
    }
}

/// Settings loaded from an optional YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub supported_platforms: PlatformSet,
    pub commit_author: CommitIdentity,
    pub substitution_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supported_platforms: PlatformSet::default(),
            commit_author: CommitIdentity::default(),
            substitution_command: "sed".to_string(),
        }
    }
}

/// Parse settings from a YAML string. An empty document yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    if yaml_content.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings = serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: Some(
            "valid keys are supported_platforms, commit_author, substitution_command".to_string(),
        ),
    })?;

    if settings.supported_platforms.is_empty() {
        return Err(Error::Config {
            message: "supported_platforms must not be empty".to_string(),
            hint: None,
        });
    }
    if settings.substitution_command.trim().is_empty() {
        return Err(Error::Config {
            message: "substitution_command must not be empty".to_string(),
            hint: None,
        });
    }
    Ok(settings)
}

/// Load settings from a YAML file.
pub fn from_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("failed to read settings file {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}

/// Architecture of the running host, using Go-style names for the two
/// architectures the templates ship console manifests for.
pub fn host_arch() -> String {
    match std::env::consts::ARCH {
        "aarch64" => "arm64".to_string(),
        "x86_64" => "amd64".to_string(),
        other => other.to_string(),
    }
}

/// Names a bootstrap run is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoNames {
    pub config_name: String,
    pub cluster_name: String,
    pub gitops_repo_name: String,
    pub metaphor_repo_name: String,
    pub git_provider: GitProvider,
    pub git_owner: String,
    pub git_protocol: GitProtocol,
}

/// Target repository record for one bootstrap run.
///
/// Built once from [`RepoNames`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionConfig {
    pub cluster_name: String,
    pub gitops_repo_name: String,
    pub metaphor_repo_name: String,
    pub git_provider: GitProvider,
    pub git_protocol: GitProtocol,

    pub destination_gitops_repo_https_url: String,
    pub destination_gitops_repo_git_url: String,
    pub destination_metaphor_repo_https_url: String,
    pub destination_metaphor_repo_git_url: String,

    pub k1_dir: PathBuf,
    pub gitops_dir: PathBuf,
    pub metaphor_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub kubeconfig: PathBuf,
    pub kubefirst_config: PathBuf,
    pub k3d_client: PathBuf,
    pub kubectl_client: PathBuf,
    pub mkcert_client: PathBuf,
    pub mkcert_pem_dir: PathBuf,
    pub mkcert_ssl_secret_dir: PathBuf,
    pub terraform_client: PathBuf,
}

impl ProvisionConfig {
    /// Derive the record for `names` rooted at `home_dir`.
    pub fn new(names: &RepoNames, home_dir: &Path) -> Self {
        let host = names.git_provider.host();
        let owner = &names.git_owner;
        let k1_dir = home_dir
            .join(".k1")
            .join("configs")
            .join(&names.config_name);
        let tools_dir = k1_dir.join("tools");
        let ssl_dir = k1_dir.join("ssl").join(DOMAIN_NAME);

        Self {
            cluster_name: names.cluster_name.clone(),
            gitops_repo_name: names.gitops_repo_name.clone(),
            metaphor_repo_name: names.metaphor_repo_name.clone(),
            git_provider: names.git_provider.clone(),
            git_protocol: names.git_protocol,

            destination_gitops_repo_https_url: https_url(host, owner, &names.gitops_repo_name),
            destination_gitops_repo_git_url: ssh_url(host, owner, &names.gitops_repo_name),
            destination_metaphor_repo_https_url: https_url(
                host,
                owner,
                &names.metaphor_repo_name,
            ),
            destination_metaphor_repo_git_url: ssh_url(host, owner, &names.metaphor_repo_name),

            gitops_dir: k1_dir.join("gitops"),
            metaphor_dir: k1_dir.join("metaphor"),
            kubeconfig: k1_dir.join("kubeconfig"),
            kubefirst_config: k1_dir.join(".kubefirst"),
            k3d_client: tools_dir.join("k3d"),
            kubectl_client: tools_dir.join("kubectl"),
            mkcert_client: tools_dir.join("mkcert"),
            terraform_client: tools_dir.join("terraform"),
            mkcert_pem_dir: ssl_dir.join("pem"),
            mkcert_ssl_secret_dir: ssl_dir.join("secrets"),
            tools_dir,
            k1_dir,
        }
    }

    /// Derive the record rooted at the current user's home directory.
    pub fn from_home(names: &RepoNames) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| Error::Config {
            message: "could not determine the home directory".to_string(),
            hint: Some("set the HOME environment variable".to_string()),
        })?;
        Ok(Self::new(names, &home))
    }

    /// Metaphor destination URL matching the configured protocol.
    pub fn destination_metaphor_url(&self) -> &str {
        match self.git_protocol {
            GitProtocol::Https => &self.destination_metaphor_repo_https_url,
            GitProtocol::Ssh => &self.destination_metaphor_repo_git_url,
        }
    }
}

fn https_url(host: &str, owner: &str, repo: &str) -> String {
    format!("https://{}/{}/{}.git", host, owner, repo)
}

fn ssh_url(host: &str, owner: &str, repo: &str) -> String {
    format!("git@{}:{}/{}.git", host, owner, repo)
}
