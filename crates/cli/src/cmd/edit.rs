//! Implementation of the `binly edit` command.
//!
//! Opens the command in `$VISUAL` / `$EDITOR` through a temporary copy and
//! saves it back when the editor exits successfully with changes.

use std::io::Write;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use binly_lib::Config;

use crate::output::{print_info, print_success};

const FALLBACK_EDITOR: &str = "vi";

/// The editor command line: `$VISUAL`, then `$EDITOR`, then `vi`.
fn editor_command() -> Vec<String> {
  ["VISUAL", "EDITOR"]
    .iter()
    .filter_map(|var| std::env::var(var).ok())
    .map(|value| value.split_whitespace().map(str::to_string).collect::<Vec<_>>())
    .find(|words| !words.is_empty())
    .unwrap_or_else(|| vec![FALLBACK_EDITOR.to_string()])
}

pub fn cmd_edit(config: Config, name: &str) -> Result<()> {
  let store = super::open_store(config)?;
  let original = store.read(name).with_context(|| format!("Error reading '{}'", name))?;

  let mut temp = tempfile::Builder::new()
    .prefix(&format!("binly-{}-", name))
    .tempfile()
    .context("Failed to create temporary file")?;
  temp.write_all(original.as_bytes())?;
  temp.flush()?;

  let editor = editor_command();
  debug!(editor = ?editor, path = %temp.path().display(), "launching editor");
  let status = Command::new(&editor[0])
    .args(&editor[1..])
    .arg(temp.path())
    .status()
    .with_context(|| format!("Failed to launch editor '{}'", editor[0]))?;
  if !status.success() {
    bail!("Editor exited with {}; '{}' left unchanged", status, name);
  }

  let edited = std::fs::read(temp.path()).context("Failed to read edited file")?;
  let edited = String::from_utf8_lossy(&edited).into_owned();
  if edited == original {
    print_info(&format!("No changes to '{}'", name));
    return Ok(());
  }

  store.write(name, &edited).with_context(|| format!("Could not save '{}'", name))?;
  print_success(&format!("Content of '{}' updated!", name));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn visual_takes_precedence() {
    temp_env::with_vars([("VISUAL", Some("code --wait")), ("EDITOR", Some("nano"))], || {
      assert_eq!(editor_command(), vec!["code", "--wait"]);
    });
  }

  #[test]
  #[serial]
  fn falls_back_to_vi() {
    temp_env::with_vars([("VISUAL", None::<&str>), ("EDITOR", Some("  "))], || {
      assert_eq!(editor_command(), vec!["vi"]);
    });
  }
}
