//! External command execution.
//!
//! The bootstrap flow shells out for exactly one thing: in-place text
//! substitution with a stream editor. `CommandRunner` is the seam that lets
//! tests replace the real process with an in-memory fake.

use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait for running external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `command` with `args` to completion.
    ///
    /// A command that cannot be spawned or exits with a non-zero status is
    /// an error; its stderr is carried in the error.
    fn run(&self, command: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// The default implementation of `CommandRunner`, which spawns real
/// processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str, args: &[&str]) -> Result<CommandOutput> {
        let rendered = render_command(command, args);
        debug!("running {}", rendered);

        let output = Command::new(command)
            .args(args)
            .output()
            .map_err(|e| Error::Command {
                command: rendered.clone(),
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(Error::Command {
                command: rendered,
                stderr: if stderr.trim().is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr.trim().to_string()
                },
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

/// Render a command line for logs and error messages.
pub fn render_command(command: &str, args: &[&str]) -> String {
    std::iter::once(command)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
