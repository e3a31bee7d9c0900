//! Tests for managing commands: new, show, write, enable, disable, remove.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn new_from_file_then_show() {
  let env = TestEnv::new();
  let file = env.write_file("hello.sh", "#!/bin/sh\necho hello\n");

  env
    .binly()
    .args(["new", "hello", "--file"])
    .arg(&file)
    .assert()
    .success()
    .stdout(predicate::str::contains("Command 'hello' created!"));

  env
    .binly()
    .args(["show", "hello"])
    .assert()
    .success()
    .stdout("#!/bin/sh\necho hello\n")
    .stderr(predicate::str::contains("Executable: YES"));
}

#[test]
fn new_from_stdin() {
  let env = TestEnv::new();

  env
    .binly()
    .args(["new", "piped"])
    .write_stdin("#!/bin/sh\necho piped\n")
    .assert()
    .success();

  assert_eq!(env.read_entry("piped"), "#!/bin/sh\necho piped\n");
}

#[test]
fn new_with_empty_stdin_uses_template() {
  let env = TestEnv::new();

  env.binly().args(["new", "blank"]).write_stdin("").assert().success();

  assert_eq!(env.read_entry("blank"), "#!/bin/sh\n\n");
}

#[test]
fn new_refuses_existing_name() {
  let env = TestEnv::new();
  std::fs::write(env.bin_path().join("taken"), "original").unwrap();

  env
    .binly()
    .args(["new", "taken"])
    .write_stdin("replacement")
    .assert()
    .failure()
    .stderr(predicate::str::contains("taken"));

  assert_eq!(env.read_entry("taken"), "original");
}

#[test]
fn new_refuses_reserved_name() {
  let env = TestEnv::new();

  env.binly().args(["new", "binly"]).write_stdin("x").assert().failure();

  assert!(!env.bin_path().join("binly").exists());
}

#[test]
fn new_with_target_derives_lowercase_name() {
  let env = TestEnv::new();
  let target = env.write_file("tools/Deploy.sh", "#!/bin/sh\necho deploy\n");

  env.binly().args(["new", "--target"]).arg(&target).assert().success();

  let wrapper = env.read_entry("deploy");
  assert!(wrapper.starts_with("#!/bin/sh\n"));
  assert!(wrapper.contains(&target.display().to_string()));
  assert!(wrapper.contains("\"$@\""));
}

#[test]
#[cfg(unix)]
fn wrapper_runs_target_with_arguments() {
  let env = TestEnv::new();
  let target = env.write_file("tools/greet", "#!/bin/sh\necho \"greet $1\"\n");
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  env
    .binly()
    .args(["new", "hi", "--target"])
    .arg(&target)
    .assert()
    .success();

  let output = std::process::Command::new(env.bin_path().join("hi"))
    .arg("world")
    .output()
    .unwrap();
  assert_eq!(String::from_utf8_lossy(&output.stdout), "greet world\n");
}

#[test]
fn write_replaces_content() {
  let env = TestEnv::new();
  env.binly().args(["new", "tool"]).write_stdin("v1").assert().success();

  env
    .binly()
    .args(["write", "tool"])
    .write_stdin("v2")
    .assert()
    .success()
    .stdout(predicate::str::contains("updated"));

  assert_eq!(env.read_entry("tool"), "v2");
}

#[test]
#[cfg(unix)]
fn disable_and_enable_toggle_run_bits() {
  use crate::common::mode_of;

  let env = TestEnv::new();
  env.binly().args(["new", "tool"]).write_stdin("#!/bin/sh\n").assert().success();
  let path = env.bin_path().join("tool");
  assert_eq!(mode_of(&path) & 0o111, 0o111);

  env
    .binly()
    .args(["disable", "tool"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Executable: NO"));
  assert_eq!(mode_of(&path) & 0o111, 0);

  env
    .binly()
    .args(["enable", "tool"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Executable: YES"));
  assert_eq!(mode_of(&path) & 0o111, 0o111);
}

#[test]
fn remove_with_force_deletes() {
  let env = TestEnv::new();
  env.binly().args(["new", "gone"]).write_stdin("x").assert().success();

  env.binly().args(["remove", "gone", "--force"]).assert().success();

  assert!(!env.bin_path().join("gone").exists());
  env.binly().args(["show", "gone"]).assert().failure();
}

#[test]
fn list_filters_case_insensitively() {
  let env = TestEnv::new();
  for name in ["backup", "Deploy", "greet"] {
    env.binly().args(["new", name]).write_stdin("x").assert().success();
  }

  env
    .binly()
    .args(["list", "DEP"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Deploy").and(predicate::str::contains("backup").not()));
}

#[test]
fn info_for_entry_shows_size() {
  let env = TestEnv::new();
  env.binly().args(["new", "tool"]).write_stdin("12345").assert().success();

  env
    .binly()
    .args(["info", "tool"])
    .assert()
    .success()
    .stdout(predicate::str::contains("5 B"));
}
