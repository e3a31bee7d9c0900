//! Implementation of the `binly enable` and `binly disable` commands.

use anyhow::{Context, Result};

use binly_lib::Config;
use binly_lib::platform::{is_executable, set_executable};

use crate::output::{print_success, print_warning, yes_no};

/// Set or clear the run bits of `name`, then report the resulting access.
pub fn cmd_toggle(config: Config, name: &str, enabled: bool) -> Result<()> {
  let store = super::open_store(config)?;
  let entry = store.entry(name).with_context(|| format!("Cannot change '{}'", name))?;

  set_executable(&entry.path, enabled).with_context(|| format!("Cannot change '{}'", name))?;

  let executable = is_executable(&entry.path);
  if executable != enabled {
    print_warning(&format!(
      "'{}' run bits updated, but the file is still {}executable for this user",
      name,
      if executable { "" } else { "not " }
    ));
  }

  print_success(&format!("File: {} | Executable: {}", name, yes_no(executable)));
  Ok(())
}
