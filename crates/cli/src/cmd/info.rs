//! Implementation of the `binly info` command.

use anyhow::{Context, Result};

use binly_lib::Config;
use binly_lib::install::{InstallOptions, Installer};

use crate::output::{format_bytes, print_stat, yes_no};

/// Without a name, describe the configuration; with one, describe that entry.
pub fn cmd_info(config: Config, name: Option<&str>) -> Result<()> {
  match name {
    Some(name) => entry_info(config, name),
    None => config_info(config),
  }
}

fn entry_info(config: Config, name: &str) -> Result<()> {
  let store = super::open_store(config)?;
  let entry = store.entry(name).with_context(|| format!("Error reading '{}'", name))?;

  println!("Command {}:", entry.name);
  print_stat("Path", &entry.path.display().to_string());
  print_stat("Size", &format_bytes(entry.size));
  print_stat("Executable", yes_no(entry.executable));
  Ok(())
}

fn config_info(config: Config) -> Result<()> {
  println!("Configuration:");
  print_stat("Bin directory", &config.bin_dir.display().to_string());
  print_stat("On PATH", yes_no(super::install::dir_on_path(&config.bin_dir)));
  print_stat("Reserved names", &config.reserved().collect::<Vec<_>>().join(", "));

  match InstallOptions::from_current_exe() {
    Ok(options) => {
      let installer_dir = options.installer_dir.display().to_string();
      let installer = Installer::new(config, options);
      print_stat("Installer directory", &installer_dir);
      print_stat("Install mode", installer.detect_mode().as_str());
    }
    Err(e) => print_stat("Install mode", &format!("unknown ({})", e)),
  }
  Ok(())
}
