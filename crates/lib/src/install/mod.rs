//! Self-installation into the bin directory.
//!
//! The installer runs a strictly sequential state machine:
//!
//! ```text
//! DETECTING → LOCATING_SOURCE → COPYING → (WRAPPING) → SETTING_PERMISSIONS → DONE
//!                                    any step ──────────────────────────────→ FAILED
//! ```
//!
//! ## Modes
//!
//! - **Packaged**: a binary named like the command sits in the installer
//!   directory and is copied to `<bin>/<app>`.
//! - **Source**: the tool's source script sits in the installer directory. It
//!   is copied to the hidden companion `<bin>/.<app>_source.<ext>` and a
//!   wrapper at `<bin>/<app>` runs it through the interpreter named in its
//!   `#!` line.
//!
//! Only the target ever gets run permission. A failed run leaves whatever it
//! already wrote; running again overwrites it.

mod task;
mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::consts::INSTALL_MODE_ENV;
use crate::error::ErrorKind;
use crate::platform::{PermissionError, is_executable, set_executable};
use crate::util::hash::hash_file_opt;
use crate::wrapper::{interpreter_wrapper, shebang_interpreter};

pub use task::{InstallHandle, spawn_install};
pub use types::{InstallManifest, InstallMode, InstallReport, InstallStage, Milestone};

/// Interpreter used when the source has no `#!` line.
const DEFAULT_INTERPRETER: &str = "/bin/sh";

/// Errors that can occur during installation.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("an install is already running")]
  AlreadyRunning,

  #[error("unknown install mode '{value}' (expected 'source' or 'packaged')")]
  InvalidMode { value: String },

  #[error("cannot locate the running installer: {0}")]
  CurrentExe(#[source] io::Error),

  #[error("{mode} artifact not found: {}", path.display())]
  SourceNotFound { mode: InstallMode, path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("failed to read source {}: {source}", path.display())]
  ReadSource { path: PathBuf, source: io::Error },

  #[error("failed to write wrapper {}: {source}", path.display())]
  WriteWrapper { path: PathBuf, source: io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Permission(#[from] PermissionError),

  #[error("install task aborted: {0}")]
  Aborted(String),
}

impl InstallError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::AlreadyRunning => ErrorKind::Busy,
      Self::InvalidMode { .. } => ErrorKind::Validation,
      Self::SourceNotFound { .. } => ErrorKind::NotFound,
      Self::Permission(_) => ErrorKind::Permission,
      Self::CurrentExe(_)
      | Self::CreateDir { .. }
      | Self::Copy { .. }
      | Self::ReadSource { .. }
      | Self::WriteWrapper { .. }
      | Self::Remove { .. }
      | Self::Aborted(_) => ErrorKind::Io,
    }
  }
}

/// Where the installer looks for what it deploys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
  /// Directory holding the packaged binary or the source script
  pub installer_dir: PathBuf,
  /// Skip detection and use this mode
  pub mode: Option<InstallMode>,
}

impl InstallOptions {
  pub fn new(installer_dir: impl Into<PathBuf>) -> Self {
    Self {
      installer_dir: installer_dir.into(),
      mode: None,
    }
  }

  pub fn with_mode(mut self, mode: Option<InstallMode>) -> Self {
    self.mode = mode;
    self
  }

  /// Options for the running executable: its directory, and the mode forced
  /// through `BINLY_INSTALL_MODE` if set.
  pub fn from_current_exe() -> Result<Self, InstallError> {
    let exe = std::env::current_exe().map_err(InstallError::CurrentExe)?;
    let exe = dunce::canonicalize(&exe).unwrap_or(exe);
    let installer_dir = exe
      .parent()
      .map(Path::to_path_buf)
      .ok_or_else(|| InstallError::CurrentExe(io::Error::other("executable has no parent directory")))?;

    let mode = match std::env::var(INSTALL_MODE_ENV) {
      Ok(value) if !value.trim().is_empty() => Some(value.parse()?),
      _ => None,
    };

    Ok(Self { installer_dir, mode })
  }
}

/// Deploys the tool into the configured bin directory.
///
/// One `Installer` runs at most one install at a time; a concurrent call is
/// rejected with [`InstallError::AlreadyRunning`].
#[derive(Debug)]
pub struct Installer {
  config: Config,
  options: InstallOptions,
  running: AtomicBool,
}

/// Clears the running flag when an install ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

impl Installer {
  pub fn new(config: Config, options: InstallOptions) -> Self {
    Self {
      config,
      options,
      running: AtomicBool::new(false),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn options(&self) -> &InstallOptions {
    &self.options
  }

  pub fn is_running(&self) -> bool {
    self.running.load(Ordering::Acquire)
  }

  fn try_begin(&self) -> Result<RunGuard<'_>, InstallError> {
    self
      .running
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .map_err(|_| InstallError::AlreadyRunning)?;
    Ok(RunGuard(&self.running))
  }

  fn packaged_artifact(&self) -> PathBuf {
    self.options.installer_dir.join(self.config.command_name())
  }

  fn source_script(&self) -> PathBuf {
    self.options.installer_dir.join(&self.config.source_name)
  }

  /// `Packaged` when a binary named like the command sits in the installer
  /// directory, `Source` otherwise. A forced mode wins.
  pub fn detect_mode(&self) -> InstallMode {
    if let Some(mode) = self.options.mode {
      debug!(%mode, "install mode forced");
      return mode;
    }

    if self.packaged_artifact().is_file() {
      InstallMode::Packaged
    } else {
      InstallMode::Source
    }
  }

  /// Path of the artifact to deploy for `mode`.
  pub fn locate_source(&self, mode: InstallMode) -> Result<PathBuf, InstallError> {
    let path = match mode {
      InstallMode::Packaged => self.packaged_artifact(),
      InstallMode::Source => self.source_script(),
    };

    if path.is_file() {
      Ok(path)
    } else {
      Err(InstallError::SourceNotFound { mode, path })
    }
  }

  /// Detect, locate and describe the run without touching the bin directory.
  pub fn plan(&self) -> Result<InstallManifest, InstallError> {
    let mode = self.detect_mode();
    let source_path = self.locate_source(mode)?;
    self.manifest(mode, source_path)
  }

  fn manifest(&self, mode: InstallMode, source_path: PathBuf) -> Result<InstallManifest, InstallError> {
    let (internal_copy_path, interpreter) = match mode {
      InstallMode::Packaged => (None, None),
      InstallMode::Source => {
        let content = fs::read(&source_path).map_err(|e| InstallError::ReadSource {
          path: source_path.clone(),
          source: e,
        })?;
        let interpreter = shebang_interpreter(&String::from_utf8_lossy(&content))
          .unwrap_or_else(|| vec![DEFAULT_INTERPRETER.to_string()]);
        (Some(absolute(&self.config.companion_path())), Some(interpreter))
      }
    };

    Ok(InstallManifest {
      mode,
      source_path,
      target_path: absolute(&self.config.target_path()),
      internal_copy_path,
      interpreter,
    })
  }

  /// Run the whole install, reporting a milestone after each transition.
  ///
  /// Blocks until done. On failure the remaining steps are skipped, a
  /// `Failed` milestone is emitted and the error is returned; nothing already
  /// written is cleaned up.
  pub fn install<F>(&self, mut progress: F) -> Result<InstallReport, InstallError>
  where
    F: FnMut(Milestone),
  {
    let _guard = self.try_begin()?;
    let started = Instant::now();
    let mut stage = InstallStage::Detecting;

    let result = self.run(&mut stage, &mut progress);

    match result {
      Ok((manifest, changed)) => {
        let report = InstallReport {
          manifest,
          changed,
          elapsed: started.elapsed(),
        };
        emit(&mut progress, InstallStage::Done, "installation successful".to_string());
        Ok(report)
      }
      Err(err) => {
        warn!(%stage, error = %err, "install failed");
        progress(Milestone {
          stage: InstallStage::Failed,
          percent: stage.percent(),
          message: format!("{} failed: {}", stage, err),
        });
        Err(err)
      }
    }
  }

  fn run<F>(&self, stage: &mut InstallStage, progress: &mut F) -> Result<(InstallManifest, bool), InstallError>
  where
    F: FnMut(Milestone),
  {
    let mut advance = |next: InstallStage, message: String| {
      *stage = next;
      emit(&mut *progress, next, message);
    };

    advance(InstallStage::Detecting, "detecting install mode".to_string());
    let mode = self.detect_mode();

    advance(InstallStage::LocatingSource, format!("detection mode: {}, checking source", mode));
    let source_path = self.locate_source(mode)?;
    let manifest = self.manifest(mode, source_path)?;

    advance(
      InstallStage::Copying,
      format!("copying {} to {}", manifest.source_path.display(), self.config.bin_dir.display()),
    );
    let bin_dir = &self.config.bin_dir;
    fs::create_dir_all(bin_dir).map_err(|e| InstallError::CreateDir {
      path: bin_dir.clone(),
      source: e,
    })?;

    let before = self.installed_state(&manifest);

    match (&manifest.internal_copy_path, &manifest.interpreter) {
      (Some(companion), Some(interpreter)) => {
        copy_replacing(&manifest.source_path, companion)?;
        set_executable(companion, false)?;

        advance(InstallStage::Wrapping, "creating executable wrapper".to_string());
        write_replacing(&manifest.target_path, &interpreter_wrapper(interpreter.as_slice(), companion))?;
      }
      _ => {
        copy_replacing(&manifest.source_path, &manifest.target_path)?;
        self.remove_stale_companion()?;
      }
    }

    advance(InstallStage::SettingPermissions, "setting execution permissions".to_string());
    set_executable(&manifest.target_path, true)?;

    let changed = before != self.installed_state(&manifest);
    info!(
      mode = %manifest.mode,
      target = %manifest.target_path.display(),
      changed,
      "installed"
    );

    Ok((manifest, changed))
  }

  /// Content hashes of the installed files plus whether the target can run.
  fn installed_state(&self, manifest: &InstallManifest) -> (Vec<Option<String>>, bool) {
    let hashes = [Some(&manifest.target_path), manifest.internal_copy_path.as_ref()]
      .into_iter()
      .flatten()
      .map(|path| hash_file_opt(path).map(|h| h.0))
      .collect();
    (hashes, is_executable(&manifest.target_path))
  }

  /// A Packaged install replaces an earlier Source install; its companion
  /// would otherwise be left behind.
  fn remove_stale_companion(&self) -> Result<(), InstallError> {
    let companion = self.config.companion_path();
    if companion.is_file() {
      debug!(path = %companion.display(), "removing stale source companion");
      fs::remove_file(&companion).map_err(|e| InstallError::Remove {
        path: companion,
        source: e,
      })?;
    }
    Ok(())
  }
}

fn emit<F>(progress: &mut F, stage: InstallStage, message: String)
where
  F: FnMut(Milestone),
{
  info!(%stage, percent = stage.percent(), "{}", message);
  progress(Milestone {
    stage,
    percent: stage.percent(),
    message,
  });
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn same_file(a: &Path, b: &Path) -> bool {
  match (dunce::canonicalize(a), dunce::canonicalize(b)) {
    (Ok(a), Ok(b)) => a == b,
    _ => false,
  }
}

/// Remove `path` if it exists. Unlinking instead of truncating keeps a
/// running copy of the old command intact.
fn unlink_existing(path: &Path) -> Result<(), InstallError> {
  match fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(InstallError::Remove {
      path: path.to_path_buf(),
      source: e,
    }),
  }
}

fn copy_replacing(from: &Path, to: &Path) -> Result<(), InstallError> {
  if same_file(from, to) {
    debug!(path = %to.display(), "source is already in place");
    return Ok(());
  }

  unlink_existing(to)?;
  fs::copy(from, to).map_err(|e| InstallError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source: e,
  })?;
  Ok(())
}

fn write_replacing(path: &Path, content: &str) -> Result<(), InstallError> {
  unlink_existing(path)?;
  fs::write(path, content).map_err(|e| InstallError::WriteWrapper {
    path: path.to_path_buf(),
    source: e,
  })
}
