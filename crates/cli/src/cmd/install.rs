//! Implementation of the `binly install` command.
//!
//! Deploys binly itself into the bin directory, either as the packaged binary
//! or as a wrapper around its source script.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use tracing::debug;

use binly_lib::Config;
use binly_lib::install::{InstallMode, InstallOptions, InstallStage, Installer, spawn_install};

use crate::output::{print_info, print_stat, print_success, print_warning, symbols};
use crate::prompts::confirm;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
  /// Detect from what sits next to the installer
  #[default]
  Auto,
  Source,
  Packaged,
}

impl ModeArg {
  fn forced(self) -> Option<InstallMode> {
    match self {
      Self::Auto => None,
      Self::Source => Some(InstallMode::Source),
      Self::Packaged => Some(InstallMode::Packaged),
    }
  }
}

/// Whether `dir` is one of the entries of `$PATH`.
pub fn dir_on_path(dir: &Path) -> bool {
  let Some(path) = std::env::var_os("PATH") else {
    return false;
  };
  let wanted = dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
  std::env::split_paths(&path).any(|entry| dunce::canonicalize(&entry).unwrap_or(entry) == wanted)
}

fn install_options(mode: ModeArg, from: Option<&Path>) -> Result<InstallOptions> {
  let mut options = match from {
    Some(dir) => {
      let dir = dunce::canonicalize(dir).with_context(|| format!("Installer directory {} not found", dir.display()))?;
      InstallOptions::new(dir)
    }
    None => InstallOptions::from_current_exe().context("Failed to locate the installer")?,
  };

  if let Some(forced) = mode.forced() {
    options = options.with_mode(Some(forced));
  }
  Ok(options)
}

/// Install binly into the bin directory.
///
/// Shows the planned deployment, asks for confirmation unless `force`, then
/// runs the installer in the background while printing its milestones.
pub fn cmd_install(
  config: Config,
  mode: ModeArg,
  from: Option<&Path>,
  source_name: Option<&str>,
  force: bool,
) -> Result<()> {
  let config = match source_name {
    Some(name) => config.with_source_name(name),
    None => config,
  };
  let options = install_options(mode, from)?;
  debug!(installer_dir = %options.installer_dir.display(), mode = ?options.mode, "install options");

  let installer = Arc::new(Installer::new(config, options));
  let plan = installer.plan().context("Installation failed")?;

  println!("Install plan:");
  print_stat("Mode", plan.mode.as_str());
  print_stat("From", &plan.source_path.display().to_string());
  print_stat("To", &plan.target_path.display().to_string());
  if let Some(companion) = &plan.internal_copy_path {
    print_stat("Source copy", &companion.display().to_string());
  }
  if let Some(interpreter) = &plan.interpreter {
    print_stat("Interpreter", &interpreter.join(" "));
  }

  let bin_dir = installer.config().bin_dir.clone();
  if !confirm(&format!("Install 'binly' to {}?", bin_dir.display()), force)? {
    print_info("Installation cancelled.");
    return Ok(());
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(async {
      let mut handle = spawn_install(Arc::clone(&installer));
      while let Some(milestone) = handle.next_milestone().await {
        if milestone.stage == InstallStage::Failed {
          continue;
        }
        println!(
          "{} [{:>3}%] {}",
          symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
          milestone.percent,
          milestone.message
        );
      }
      handle.wait().await
    })
    .context("Installation failed")?;

  if report.changed {
    print_success("binly is now installed! Type 'binly' in your terminal.");
  } else {
    print_success("binly is already up to date.");
  }
  print_stat("Elapsed", &humantime::format_duration(round_millis(report.elapsed)).to_string());

  if !dir_on_path(&bin_dir) {
    print_warning(&format!("{} is not on your PATH", bin_dir.display()));
  }
  Ok(())
}

fn round_millis(elapsed: Duration) -> Duration {
  Duration::from_millis(elapsed.as_millis() as u64)
}
