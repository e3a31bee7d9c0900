//! Script store operations for binly.
//!
//! The store is the bin directory itself: every regular file directly inside
//! it is an entry, except for the reserved names binly uses for its own
//! installation.
//!
//! # Layout
//!
//! ```text
//! ~/.local/bin/
//! ├── binly                 # reserved: the installed command
//! ├── .binly_source.sh      # reserved: SOURCE mode companion
//! ├── hello                 # entry
//! └── deploy                # entry
//! ```
//!
//! No locks are taken. Concurrent writers race and the last one wins.

mod listing;
mod types;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ErrorKind;
use crate::platform::{PermissionError, is_executable, set_executable};

pub use listing::{Entries, Listing};
pub use types::ScriptEntry;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("invalid entry name '{name}': {reason}")]
  InvalidName { name: String, reason: &'static str },

  #[error("'{name}' is reserved and cannot be managed")]
  Reserved { name: String },

  #[error("no entry named '{name}' in {}", dir.display())]
  NotFound { name: String, dir: PathBuf },

  #[error("an entry named '{name}' already exists")]
  AlreadyExists { name: String },

  #[error("'{name}' exists but is not a regular file")]
  NotAFile { name: String },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to list {path}: {source}")]
  List {
    path: String,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Permission(#[from] PermissionError),
}

impl StoreError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidName { .. } | Self::Reserved { .. } | Self::AlreadyExists { .. } | Self::NotAFile { .. } => {
        ErrorKind::Validation
      }
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Permission(_) => ErrorKind::Permission,
      Self::CreateDir { .. } | Self::List { .. } | Self::Read { .. } | Self::Write { .. } | Self::Remove { .. } => {
        ErrorKind::Io
      }
    }
  }
}

/// Check that `name` can name an entry directly inside the bin directory.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
  let invalid = |reason| {
    Err(StoreError::InvalidName {
      name: name.to_string(),
      reason,
    })
  };

  if name.trim().is_empty() {
    return invalid("name is empty");
  }
  if name == "." || name == ".." {
    return invalid("name refers to a directory");
  }
  if name.contains('/') || name.contains('\\') {
    return invalid("name contains a path separator");
  }
  if name.contains('\0') {
    return invalid("name contains a NUL byte");
  }

  Ok(())
}

/// Entries of the bin directory.
#[derive(Debug)]
pub struct ScriptStore {
  config: Config,
}

impl ScriptStore {
  /// Open the store, creating the bin directory if it does not exist.
  pub fn open(config: Config) -> Result<Self, StoreError> {
    fs::create_dir_all(&config.bin_dir).map_err(|e| StoreError::CreateDir {
      path: config.bin_dir.clone(),
      source: e,
    })?;

    debug!(dir = %config.bin_dir.display(), "opened script store");
    Ok(Self { config })
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn dir(&self) -> &Path {
    &self.config.bin_dir
  }

  /// Path of entry `name`, after validating the name.
  pub fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
    validate_name(name)?;
    if self.config.is_reserved(name) {
      return Err(StoreError::Reserved { name: name.to_string() });
    }
    Ok(self.dir().join(name))
  }

  /// Entry names containing `filter` (case-insensitive), sorted.
  ///
  /// An empty filter matches everything.
  pub fn list(&self, filter: &str) -> Listing<'_> {
    Listing::new(self, filter)
  }

  /// Full content of `name`, invalid UTF-8 replaced with U+FFFD.
  pub fn read(&self, name: &str) -> Result<String, StoreError> {
    let path = self.existing_path(name)?;
    let bytes = fs::read(&path).map_err(|e| {
      self.io_error(name, e, |source| StoreError::Read {
        path: path.clone(),
        source,
      })
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Create or overwrite `name` with exactly `content`.
  ///
  /// Permission bits of an existing entry are kept. A name taken by a
  /// directory or by a link that does not resolve to a regular file is
  /// rejected.
  pub fn write(&self, name: &str, content: &str) -> Result<(), StoreError> {
    let path = self.path_of(name)?;
    if fs::symlink_metadata(&path).is_ok() && !path.is_file() {
      return Err(StoreError::NotAFile { name: name.to_string() });
    }
    fs::write(&path, content).map_err(|e| StoreError::Write {
      path: path.clone(),
      source: e,
    })?;

    info!(name, bytes = content.len(), "wrote entry");
    Ok(())
  }

  /// Write a new entry and mark it executable, failing if `name` already
  /// exists.
  pub fn create(&self, name: &str, content: &str) -> Result<ScriptEntry, StoreError> {
    let path = self.path_of(name)?;

    let mut file = OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => StoreError::AlreadyExists { name: name.to_string() },
        _ => StoreError::Write {
          path: path.clone(),
          source: e,
        },
      })?;
    if let Err(e) = file.write_all(content.as_bytes()) {
      drop(file);
      // Retries must not hit AlreadyExists on a half-written entry.
      let _ = fs::remove_file(&path);
      return Err(StoreError::Write { path, source: e });
    }
    drop(file);
    set_executable(&path, true)?;

    info!(name, bytes = content.len(), "created entry");
    self.entry(name)
  }

  /// Delete `name`. Callers are responsible for confirming first.
  pub fn remove(&self, name: &str) -> Result<(), StoreError> {
    let path = self.existing_path(name)?;
    fs::remove_file(&path).map_err(|e| {
      self.io_error(name, e, |source| StoreError::Remove {
        path: path.clone(),
        source,
      })
    })?;

    info!(name, "removed entry");
    Ok(())
  }

  /// Snapshot of entry `name`.
  pub fn entry(&self, name: &str) -> Result<ScriptEntry, StoreError> {
    let path = self.existing_path(name)?;
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    let executable = is_executable(&path);

    Ok(ScriptEntry {
      name: name.to_string(),
      path,
      size,
      executable,
    })
  }

  /// Path of `name` if it is an existing regular file.
  fn existing_path(&self, name: &str) -> Result<PathBuf, StoreError> {
    let path = self.path_of(name)?;
    match fs::metadata(&path) {
      Ok(metadata) if metadata.is_file() => Ok(path),
      _ => Err(self.not_found(name)),
    }
  }

  fn not_found(&self, name: &str) -> StoreError {
    StoreError::NotFound {
      name: name.to_string(),
      dir: self.dir().to_path_buf(),
    }
  }

  /// Files can vanish between the existence check and the operation.
  fn io_error(&self, name: &str, err: io::Error, wrap: impl FnOnce(io::Error) -> StoreError) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
      self.not_found(name)
    } else {
      wrap(err)
    }
  }
}
