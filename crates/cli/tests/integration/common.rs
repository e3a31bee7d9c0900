//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary directory with an isolated bin directory
/// and an installer directory to deploy from.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Bin directory managed by the commands under test.
  pub fn bin_path(&self) -> PathBuf {
    let p = self.temp.path().join("bin");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Directory the installer deploys from.
  pub fn dist_path(&self) -> PathBuf {
    let p = self.temp.path().join("dist");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Content of a bin directory entry.
  pub fn read_entry(&self, name: &str) -> String {
    std::fs::read_to_string(self.bin_path().join(name)).unwrap()
  }

  /// Create a command for `binly` with the bin directory set.
  pub fn binly(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("binly");
    cmd
      .arg("--bin-dir")
      .arg(self.bin_path())
      .env_remove("BINLY_BIN_DIR")
      .env_remove("BINLY_INSTALL_MODE");
    cmd
  }
}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}
