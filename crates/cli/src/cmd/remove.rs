//! Implementation of the `binly remove` command.

use anyhow::{Context, Result};

use binly_lib::Config;

use crate::output::{print_info, print_success};
use crate::prompts::confirm;

/// Delete `name` after confirmation. Removal cannot be undone.
pub fn cmd_remove(config: Config, name: &str, force: bool) -> Result<()> {
  let store = super::open_store(config)?;

  // Fail on a missing entry before prompting for it.
  store.entry(name).with_context(|| format!("Cannot remove '{}'", name))?;

  if !confirm(&format!("Delete '{}'?", name), force)? {
    print_info("Nothing removed.");
    return Ok(());
  }

  store.remove(name).with_context(|| format!("Cannot remove '{}'", name))?;
  print_success(&format!("Removed '{}'", name));
  Ok(())
}
