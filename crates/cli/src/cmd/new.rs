//! Implementation of the `binly new` command.
//!
//! Creates a command either as a wrapper around an existing file (`--target`)
//! or from freeform content (`--file`, stdin, or the blank template).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use binly_lib::Config;
use binly_lib::wrapper::{auto_wrapper, manual_template};

use crate::output::{print_success, print_warning};
use crate::prompts::read_content;

/// Default command name for a wrapper: the target's file stem, lowercased.
pub fn name_from_target(target: &Path) -> Option<String> {
  target
    .file_stem()
    .map(|stem| stem.to_string_lossy().to_lowercase())
    .filter(|stem| !stem.is_empty())
}

/// Create a new command and make it executable.
///
/// # Errors
///
/// Fails if no name can be determined, the name is invalid or reserved, or a
/// command with that name already exists.
pub fn cmd_new(config: Config, name: Option<&str>, target: Option<&Path>, file: Option<&Path>) -> Result<()> {
  let store = super::open_store(config)?;

  let (name, content) = match target {
    Some(target) => {
      let name = match name {
        Some(name) => name.trim().to_string(),
        None => name_from_target(target).context("Cannot derive a command name from the target; pass NAME")?,
      };
      let target = absolute(target);
      if !target.is_file() {
        print_warning(&format!("Target {} does not exist yet", target.display()));
      }
      (name, auto_wrapper(&target))
    }
    None => {
      let Some(name) = name else {
        bail!("A command name is required unless --target is given");
      };
      let content = read_content(file)?.unwrap_or_else(manual_template);
      (name.trim().to_string(), content)
    }
  };

  store
    .create(&name, &content)
    .with_context(|| format!("Could not create '{}'", name))?;

  print_success(&format!("Command '{}' created!", name));
  Ok(())
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
