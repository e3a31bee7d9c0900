use crate::consts::BIN_DIR_ENV;
use std::path::PathBuf;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the per-user local binaries directory (`~/.local/bin`)
pub fn default_bin_dir() -> Option<PathBuf> {
  home_dir().map(|home| home.join(".local").join("bin"))
}

/// Returns the bin directory, honoring `BINLY_BIN_DIR`
pub fn bin_dir() -> Option<PathBuf> {
  if let Some(path) = std::env::var_os(BIN_DIR_ENV).filter(|p| !p.is_empty()) {
    return Some(PathBuf::from(path));
  }

  default_bin_dir()
}
