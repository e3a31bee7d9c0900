mod edit;
mod info;
mod install;
mod list;
mod new;
mod remove;
mod show;
mod template;
mod toggle;
mod write;

use std::path::Path;

use anyhow::{Context, Result};

use binly_lib::Config;
use binly_lib::store::ScriptStore;

pub use edit::cmd_edit;
pub use info::cmd_info;
pub use install::{ModeArg, cmd_install};
pub use list::cmd_list;
pub use new::cmd_new;
pub use remove::cmd_remove;
pub use show::cmd_show;
pub use template::cmd_template;
pub use toggle::cmd_toggle;
pub use write::cmd_write;

/// Resolve the configuration once: `--bin-dir` first, then the environment.
pub fn resolve_config(bin_dir: Option<&Path>) -> Result<Config> {
  match bin_dir {
    Some(dir) => Ok(Config::for_bin_dir(dir)),
    None => Config::from_env().context("Failed to resolve configuration"),
  }
}

fn open_store(config: Config) -> Result<ScriptStore> {
  let dir = config.bin_dir.clone();
  ScriptStore::open(config).with_context(|| format!("Failed to open bin directory {}", dir.display()))
}
