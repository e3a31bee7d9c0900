//! Process-wide configuration.
//!
//! A `Config` is resolved once at startup and passed explicitly to the store
//! and the installer. It fixes the bin directory and the reserved names that
//! are never listed or touched as entries.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{APP_NAME, BIN_DIR_ENV};
use crate::error::ErrorKind;
use crate::platform::paths;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("cannot determine the bin directory: set BINLY_BIN_DIR or HOME")]
  NoBinDir,
}

impl ConfigError {
  pub fn kind(&self) -> ErrorKind {
    ErrorKind::Validation
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Directory holding the managed entries
  pub bin_dir: PathBuf,
  /// Name of the deployed command
  pub app_name: String,
  /// File name of the tool's source script (SOURCE mode installs)
  pub source_name: String,
  reserved: BTreeSet<String>,
}

impl Config {
  pub fn new(bin_dir: impl Into<PathBuf>, app_name: impl Into<String>, source_name: impl Into<String>) -> Self {
    let mut config = Self {
      bin_dir: bin_dir.into(),
      app_name: app_name.into(),
      source_name: source_name.into(),
      reserved: BTreeSet::new(),
    };
    config.reserved = config.compute_reserved();
    config
  }

  /// Config for `bin_dir` with the default app and source names.
  pub fn for_bin_dir(bin_dir: impl Into<PathBuf>) -> Self {
    Self::new(bin_dir, APP_NAME, default_source_name(APP_NAME))
  }

  /// Resolve the configuration from the environment.
  ///
  /// The bin directory is `$BINLY_BIN_DIR`, falling back to `~/.local/bin`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let bin_dir = paths::bin_dir().ok_or(ConfigError::NoBinDir)?;
    Ok(Self::for_bin_dir(bin_dir))
  }

  pub fn with_source_name(self, source_name: impl Into<String>) -> Self {
    Self::new(self.bin_dir, self.app_name, source_name)
  }

  pub fn is_reserved(&self, name: &str) -> bool {
    self.reserved.contains(name)
  }

  /// Reserved names in sorted order.
  pub fn reserved(&self) -> impl Iterator<Item = &str> {
    self.reserved.iter().map(String::as_str)
  }

  /// File name of the deployed command, with the platform executable suffix.
  pub fn command_name(&self) -> String {
    format!("{}{}", self.app_name, std::env::consts::EXE_SUFFIX)
  }

  /// Hidden companion holding the real source in SOURCE mode installs.
  ///
  /// Keeps the source's extension: `binly.sh` becomes `.binly_source.sh`.
  pub fn companion_name(&self) -> String {
    match Path::new(&self.source_name).extension() {
      Some(ext) => format!(".{}_source.{}", self.app_name, ext.to_string_lossy()),
      None => format!(".{}_source", self.app_name),
    }
  }

  pub fn target_path(&self) -> PathBuf {
    self.bin_dir.join(self.command_name())
  }

  pub fn companion_path(&self) -> PathBuf {
    self.bin_dir.join(self.companion_name())
  }

  fn compute_reserved(&self) -> BTreeSet<String> {
    [
      self.app_name.clone(),
      self.command_name(),
      self.source_name.clone(),
      self.companion_name(),
    ]
    .into_iter()
    .collect()
  }
}

pub fn default_source_name(app_name: &str) -> String {
  format!("{}.sh", app_name)
}
