//! Implementation of the `binly show` command.

use std::io::{self, Write};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use binly_lib::Config;

use crate::output::yes_no;

/// Print the content of `name` to stdout and its status to stderr.
pub fn cmd_show(config: Config, name: &str) -> Result<()> {
  let store = super::open_store(config)?;
  let entry = store.entry(name).with_context(|| format!("Error reading '{}'", name))?;
  let content = store.read(name).with_context(|| format!("Error reading '{}'", name))?;

  let status = format!("File: {} | Executable: {}", entry.name, yes_no(entry.executable));
  if entry.executable {
    eprintln!("{}", status.if_supports_color(Stream::Stderr, |s| s.green()));
  } else {
    eprintln!("{}", status.if_supports_color(Stream::Stderr, |s| s.red()));
  }

  let mut stdout = io::stdout().lock();
  stdout.write_all(content.as_bytes())?;
  stdout.flush()?;
  Ok(())
}
