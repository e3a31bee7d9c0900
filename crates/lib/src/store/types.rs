use std::path::PathBuf;

use serde::Serialize;

/// A managed file inside the bin directory.
///
/// `executable` is read from the filesystem when the entry is built and is
/// never stored anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptEntry {
  pub name: String,
  pub path: PathBuf,
  pub size: u64,
  pub executable: bool,
}
