//! Tests for `binly install`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn source_install_writes_wrapper_and_companion() {
  let env = TestEnv::new();
  env.write_file("dist/binly.sh", "#!/bin/sh\necho from-source\n");

  env
    .binly()
    .args(["install", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("binly is now installed!"));

  let wrapper = env.read_entry("binly");
  assert!(wrapper.starts_with("#!/bin/sh\n"));
  assert!(wrapper.contains(".binly_source.sh"));
  assert_eq!(env.read_entry(".binly_source.sh"), "#!/bin/sh\necho from-source\n");
}

#[test]
#[cfg(unix)]
fn source_install_only_target_is_executable() {
  use crate::common::mode_of;

  let env = TestEnv::new();
  env.write_file("dist/binly.sh", "#!/bin/sh\necho from-source\n");

  env
    .binly()
    .args(["install", "--mode", "source", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .success();

  assert_eq!(mode_of(&env.bin_path().join("binly")) & 0o111, 0o111);
  assert_eq!(mode_of(&env.bin_path().join(".binly_source.sh")) & 0o111, 0);

  let output = std::process::Command::new(env.bin_path().join("binly")).output().unwrap();
  assert_eq!(String::from_utf8_lossy(&output.stdout), "from-source\n");
}

#[test]
#[cfg(not(windows))]
fn packaged_install_copies_binary() {
  let env = TestEnv::new();
  env.write_file("dist/binly", "packaged-binary");

  env
    .binly()
    .args(["install", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("packaged"));

  assert_eq!(env.read_entry("binly"), "packaged-binary");
  assert!(!env.bin_path().join(".binly_source.sh").exists());
}

#[test]
fn second_install_reports_up_to_date() {
  let env = TestEnv::new();
  env.write_file("dist/binly.sh", "#!/bin/sh\n");

  env
    .binly()
    .args(["install", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .success();

  env
    .binly()
    .args(["install", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("already up to date"));
}

#[test]
fn install_without_artifact_fails() {
  let env = TestEnv::new();

  env
    .binly()
    .args(["install", "--force", "--from"])
    .arg(env.dist_path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("Installation failed"));

  assert!(!env.bin_path().join("binly").exists());
}

#[test]
fn custom_source_name_is_used() {
  let env = TestEnv::new();
  env.write_file("dist/tool.py", "#!/usr/bin/env python3\nprint('hi')\n");

  env
    .binly()
    .args(["install", "--force", "--source-name", "tool.py", "--from"])
    .arg(env.dist_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("python3"));

  assert!(env.bin_path().join(".binly_source.py").exists());
}

#[test]
fn install_without_force_in_pipe_fails() {
  let env = TestEnv::new();
  env.write_file("dist/binly.sh", "#!/bin/sh\n");

  env
    .binly()
    .args(["install", "--from"])
    .arg(env.dist_path())
    .write_stdin("")
    .assert()
    .failure();

  assert!(!env.bin_path().join("binly").exists());
}
