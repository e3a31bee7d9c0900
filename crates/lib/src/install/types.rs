use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use super::InstallError;

/// How the installer was shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMode {
  /// The tool's source script sits next to the installer.
  Source,
  /// A self-contained binary sits next to the installer.
  Packaged,
}

impl InstallMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Source => "source",
      Self::Packaged => "packaged",
    }
  }
}

impl fmt::Display for InstallMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for InstallMode {
  type Err = InstallError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "source" => Ok(Self::Source),
      "packaged" | "binary" => Ok(Self::Packaged),
      _ => Err(InstallError::InvalidMode { value: s.to_string() }),
    }
  }
}

/// Installer states, in the only order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStage {
  Detecting,
  LocatingSource,
  Copying,
  Wrapping,
  SettingPermissions,
  Done,
  Failed,
}

impl InstallStage {
  /// Progress reached when this stage is entered.
  pub fn percent(&self) -> u8 {
    match self {
      Self::Detecting => 0,
      Self::LocatingSource => 20,
      Self::Copying => 40,
      Self::Wrapping => 60,
      Self::SettingPermissions => 80,
      Self::Done => 100,
      Self::Failed => 0,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Detecting => "detecting",
      Self::LocatingSource => "locating source",
      Self::Copying => "copying",
      Self::Wrapping => "wrapping",
      Self::SettingPermissions => "setting permissions",
      Self::Done => "done",
      Self::Failed => "failed",
    }
  }
}

impl fmt::Display for InstallStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Progress checkpoint emitted after each state transition.
///
/// Milestones are for display only; an install cannot resume from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
  pub stage: InstallStage,
  pub percent: u8,
  pub message: String,
}

/// What one installer run will do. Computed per run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallManifest {
  pub mode: InstallMode,
  /// Artifact to deploy
  pub source_path: PathBuf,
  /// Final command path, without extension
  pub target_path: PathBuf,
  /// Hidden companion holding the real source (SOURCE mode only)
  pub internal_copy_path: Option<PathBuf>,
  /// Runtime the wrapper runs the companion with (SOURCE mode only)
  pub interpreter: Option<Vec<String>>,
}

/// Outcome of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
  pub manifest: InstallManifest,
  /// Whether the installed files differ from what was there before
  pub changed: bool,
  pub elapsed: Duration,
}
