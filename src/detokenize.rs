//! In-place placeholder replacement in template files.
//!
//! Replacement is delegated to an external stream editor invoked as
//! `<editor> -i s/TOKEN/"value"/ <file>`: the token is replaced by the
//! value wrapped in double quotes, once per line.

use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::process::CommandRunner;

/// Placeholder for the gitops repository name in `repos.tf`.
pub const GITOPS_REPO_NAME_TOKEN: &str = "GITOPS_REPO_NAME";
/// Placeholder for the metaphor repository name in `repos.tf`.
pub const METAPHOR_REPO_NAME_TOKEN: &str = "METAPHOR_REPO_NAME";

/// Build the substitution expression replacing `token` with `"value"`.
pub fn substitution_pattern(token: &str, value: &str) -> String {
    format!("s/{}/\"{}\"/", token, value)
}

/// Replace `token` with the quoted `value` in `file`, editing it in place.
pub fn substitute_in_place(
    runner: &dyn CommandRunner,
    editor: &str,
    file: &Path,
    token: &str,
    value: &str,
) -> Result<()> {
    let pattern = substitution_pattern(token, value);
    let file_arg = file.to_string_lossy();
    info!("detokenizing {} in {}", token, file.display());

    runner
        .run(editor, &["-i", pattern.as_str(), file_arg.as_ref()])
        .map_err(|e| Error::Substitution {
            file: file.display().to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
    Ok(())
}
