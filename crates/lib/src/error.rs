//! Error classification shared by every module.
//!
//! Each module defines its own error enum with the failing path and the
//! underlying cause. `ErrorKind` is the coarse category callers use to pick a
//! user-facing message.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// Entry or artifact absent.
  NotFound,
  /// Permission change rejected.
  Permission,
  /// Generic read/write failure.
  Io,
  /// Malformed name or path, empty required field.
  Validation,
  /// An install run is already active.
  Busy,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::NotFound => "not found",
      Self::Permission => "permission error",
      Self::Io => "I/O error",
      Self::Validation => "validation error",
      Self::Busy => "busy",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
