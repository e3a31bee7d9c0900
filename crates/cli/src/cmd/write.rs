//! Implementation of the `binly write` command.

use std::path::Path;

use anyhow::{Context, Result, bail};

use binly_lib::Config;

use crate::output::print_success;
use crate::prompts::read_content;

/// Replace the content of `name` with `file` or stdin, creating it if needed.
pub fn cmd_write(config: Config, name: &str, file: Option<&Path>) -> Result<()> {
  let store = super::open_store(config)?;

  let Some(content) = read_content(file)? else {
    bail!("No content given: pass --file or pipe the script on stdin");
  };

  store
    .write(name, &content)
    .with_context(|| format!("Could not write '{}'", name))?;

  print_success(&format!("Content of '{}' updated!", name));
  Ok(())
}
