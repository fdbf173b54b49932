//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gitops_bootstrap::config::{self, Settings};

use crate::commands;

/// GitOps Bootstrap - Materialize gitops and metaphor repositories for a local platform
#[derive(Parser, Debug)]
#[command(name = "gitops-bootstrap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Path to a YAML settings file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "GITOPS_BOOTSTRAP_SETTINGS"
    )]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce a gitops template tree to one provider variant and cluster
    Gitops(commands::gitops::GitopsArgs),

    /// Assemble the metaphor repository from a pruned gitops tree
    Metaphor(commands::metaphor::MetaphorArgs),

    /// Run both phases for a named configuration under ~/.k1
    Bootstrap(commands::bootstrap::BootstrapArgs),

    /// List the supported cloud/git provider variants
    Platforms,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let settings = match &self.settings {
            Some(path) => config::from_file(path)?,
            None => Settings::default(),
        };

        match self.command {
            Commands::Gitops(args) => commands::gitops::execute(args, &settings),
            Commands::Metaphor(args) => commands::metaphor::execute(args, &settings),
            Commands::Bootstrap(args) => commands::bootstrap::execute(args, &settings),
            Commands::Platforms => commands::platforms::execute(&settings),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second initialization (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
