//! Run permission management.
//!
//! ## Platform Behavior
//!
//! - **Unix**: toggles the owner, group and other run bits (`0o111`) and
//!   reports run access through `access(2)` with `X_OK`
//! - **Windows**: there is no run bit; every file reports executable and
//!   toggling is a no-op

use std::path::Path;

use tracing::debug;

use crate::error::ErrorKind;

/// Error while changing run permission.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
  #[error("failed to read metadata for {path}: {source}")]
  Metadata {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to set permissions on {path}: {source}")]
  SetPermissions {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

impl PermissionError {
  pub fn kind(&self) -> ErrorKind {
    ErrorKind::Permission
  }
}

/// Set or clear the run bits of `path` for owner, group and other.
///
/// Read/write bits and every other mode bit are left untouched.
#[cfg(unix)]
pub fn set_executable(path: &Path, enabled: bool) -> Result<(), PermissionError> {
  use std::os::unix::fs::PermissionsExt;

  use crate::consts::RUN_BITS;

  let metadata = std::fs::metadata(path).map_err(|e| PermissionError::Metadata {
    path: path.display().to_string(),
    source: e,
  })?;

  let current_mode = metadata.permissions().mode();
  let new_mode = if enabled {
    current_mode | RUN_BITS
  } else {
    current_mode & !RUN_BITS
  };

  debug!(
    path = ?path,
    from = %format!("{:o}", current_mode & 0o7777),
    to = %format!("{:o}", new_mode & 0o7777),
    "changing mode"
  );

  let mut perms = metadata.permissions();
  perms.set_mode(new_mode);
  std::fs::set_permissions(path, perms).map_err(|e| PermissionError::SetPermissions {
    path: path.display().to_string(),
    source: e,
  })?;

  Ok(())
}

#[cfg(not(unix))]
pub fn set_executable(path: &Path, enabled: bool) -> Result<(), PermissionError> {
  debug!(path = ?path, enabled, "run permission is not supported on this platform");
  Ok(())
}

/// Whether the current process may execute `path`.
///
/// This is an access check, so ownership and ACLs are taken into account
/// rather than just the mode bits.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
  use rustix::fs::{Access, access};

  access(path, Access::EXEC_OK).is_ok()
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
  true
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
  use super::*;
  use std::fs;
  use std::os::unix::fs::PermissionsExt;
  use tempfile::TempDir;

  fn mode(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
  }

  fn file_with_mode(temp: &TempDir, name: &str, mode: u32) -> std::path::PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    path
  }

  #[test]
  fn enable_sets_all_run_bits() {
    let temp = TempDir::new().unwrap();
    let path = file_with_mode(&temp, "hello", 0o644);

    assert!(!is_executable(&path));
    set_executable(&path, true).unwrap();

    assert_eq!(mode(&path), 0o755);
    assert!(is_executable(&path));
  }

  #[test]
  fn disable_clears_all_run_bits() {
    let temp = TempDir::new().unwrap();
    let path = file_with_mode(&temp, "hello", 0o775);

    set_executable(&path, false).unwrap();

    assert_eq!(mode(&path), 0o664);
    assert!(!is_executable(&path));
  }

  #[test]
  fn read_write_bits_are_preserved() {
    let temp = TempDir::new().unwrap();
    let path = file_with_mode(&temp, "private", 0o600);

    set_executable(&path, true).unwrap();
    assert_eq!(mode(&path) & 0o666, 0o600);

    set_executable(&path, false).unwrap();
    assert_eq!(mode(&path), 0o600);
  }

  #[test]
  fn toggling_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = file_with_mode(&temp, "twice", 0o644);

    set_executable(&path, true).unwrap();
    set_executable(&path, true).unwrap();
    assert_eq!(mode(&path), 0o755);

    set_executable(&path, false).unwrap();
    set_executable(&path, false).unwrap();
    assert_eq!(mode(&path), 0o644);
  }

  #[test]
  fn missing_file_is_a_permission_error() {
    let temp = TempDir::new().unwrap();
    let err = set_executable(&temp.path().join("missing"), true).unwrap_err();

    assert!(matches!(err, PermissionError::Metadata { .. }));
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert!(err.to_string().contains("missing"));
  }

  #[test]
  fn missing_file_is_not_executable() {
    let temp = TempDir::new().unwrap();
    assert!(!is_executable(&temp.path().join("missing")));
  }
}
