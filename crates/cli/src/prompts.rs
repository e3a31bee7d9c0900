use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

/// Ask a yes/no question on the terminal. `force` answers yes without asking.
pub fn confirm(message: &str, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --force to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Script content from `file`, or from stdin when it is not a terminal.
///
/// Returns `None` when neither is available or stdin is empty.
pub fn read_content(file: Option<&Path>) -> Result<Option<String>> {
  if let Some(path) = file {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
  }

  if io::stdin().is_terminal() {
    return Ok(None);
  }

  let mut bytes = Vec::new();
  io::stdin().read_to_end(&mut bytes)?;
  if bytes.is_empty() {
    return Ok(None);
  }
  Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
