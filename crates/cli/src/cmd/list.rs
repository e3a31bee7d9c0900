//! Implementation of the `binly list` command.

use anyhow::{Context, Result};

use binly_lib::Config;
use binly_lib::store::ScriptEntry;

use crate::output::{OutputFormat, print_entry, print_info, print_json};

/// List the commands whose name contains `filter`, marking which can run.
pub fn cmd_list(config: Config, filter: &str, format: OutputFormat) -> Result<()> {
  let store = super::open_store(config)?;
  let names = store.list(filter).names().context("Failed to list commands")?;

  if format.is_json() {
    let entries = names
      .iter()
      .map(|name| store.entry(name))
      .collect::<Result<Vec<ScriptEntry>, _>>()
      .context("Failed to read command details")?;
    return print_json(&entries);
  }

  if names.is_empty() {
    if filter.is_empty() {
      print_info(&format!("No commands in {}", store.dir().display()));
    } else {
      print_info(&format!("No commands matching '{}'", filter));
    }
    return Ok(());
  }

  for name in &names {
    let executable = store.entry(name).map(|e| e.executable).unwrap_or(false);
    print_entry(name, executable);
  }

  Ok(())
}
