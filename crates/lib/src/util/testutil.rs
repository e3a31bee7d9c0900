//! Test utilities for binly-lib.
//!
//! Helpers for tests that create and execute small shell scripts.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::platform::set_executable;

/// Write an executable script that prints each argument on its own line.
pub fn write_args_printer(dir: &Path, name: &str) -> PathBuf {
  let path = dir.join(name);
  std::fs::write(&path, "#!/bin/sh\nprintf '%s\\n' \"$@\"\n").unwrap();
  set_executable(&path, true).unwrap();
  path
}

/// Run `program` with `args` and return its stdout, panicking on failure.
///
/// Retries briefly on ETXTBSY, which parallel tests can trigger right after a
/// script has been written.
pub fn run(program: &Path, args: &[&str]) -> String {
  const ETXTBSY: i32 = 26;

  let mut attempts = 0;
  let output = loop {
    match Command::new(program).args(args).output() {
      Ok(output) => break output,
      Err(e) if e.raw_os_error() == Some(ETXTBSY) && attempts < 10 => {
        attempts += 1;
        std::thread::sleep(std::time::Duration::from_millis(20));
      }
      Err(e) => panic!("failed to run {}: {}", program.display(), e),
    }
  };
  assert!(
    output.status.success(),
    "{} exited with {}: {}",
    program.display(),
    output.status,
    String::from_utf8_lossy(&output.stderr)
  );
  String::from_utf8_lossy(&output.stdout).into_owned()
}
