mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use binly_lib::ErrorKind;
use binly_lib::config::ConfigError;
use binly_lib::install::InstallError;
use binly_lib::platform::PermissionError;
use binly_lib::store::StoreError;

use cmd::{
  ModeArg, cmd_edit, cmd_info, cmd_install, cmd_list, cmd_new, cmd_remove, cmd_show, cmd_template, cmd_toggle,
  cmd_write, resolve_config,
};
use output::{OutputFormat, print_error};

/// binly - manage the small scripts in your ~/.local/bin
#[derive(Parser)]
#[command(name = "binly")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Bin directory to manage (default: $BINLY_BIN_DIR, then ~/.local/bin)
  #[arg(long, global = true, value_name = "DIR")]
  bin_dir: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List commands, optionally only those whose name contains FILTER
  List {
    /// Case-insensitive substring to match
    #[arg(default_value = "")]
    filter: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Print the content of a command
  Show { name: String },

  /// Show configuration, or details of one command
  Info { name: Option<String> },

  /// Create a command from a file, stdin, the blank template, or as a wrapper
  New {
    /// Command name (derived from --target when omitted)
    name: Option<String>,

    /// Wrap an existing executable or script
    #[arg(short, long, value_name = "PATH", conflicts_with = "file")]
    target: Option<PathBuf>,

    /// Read the content from this file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
  },

  /// Replace the content of a command from a file or stdin
  Write {
    name: String,

    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
  },

  /// Open a command in $VISUAL or $EDITOR
  Edit { name: String },

  /// Allow a command to run
  Enable { name: String },

  /// Stop a command from running without deleting it
  Disable { name: String },

  /// Delete a command
  Remove {
    name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    force: bool,
  },

  /// Print the blank template for new commands
  Template,

  /// Install binly itself into the bin directory
  Install {
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// Directory holding the binary or source script to deploy
    #[arg(long, value_name = "DIR")]
    from: Option<PathBuf>,

    /// File name of the source script (default: binly.sh)
    #[arg(long, value_name = "NAME")]
    source_name: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    force: bool,
  },
}

fn init_logging(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let bin_dir = cli.bin_dir;
  let config = || resolve_config(bin_dir.as_deref());

  match cli.command {
    Commands::List { filter, format } => cmd_list(config()?, &filter, format),
    Commands::Show { name } => cmd_show(config()?, &name),
    Commands::Info { name } => cmd_info(config()?, name.as_deref()),
    Commands::New { name, target, file } => cmd_new(config()?, name.as_deref(), target.as_deref(), file.as_deref()),
    Commands::Write { name, file } => cmd_write(config()?, &name, file.as_deref()),
    Commands::Edit { name } => cmd_edit(config()?, &name),
    Commands::Enable { name } => cmd_toggle(config()?, &name, true),
    Commands::Disable { name } => cmd_toggle(config()?, &name, false),
    Commands::Remove { name, force } => cmd_remove(config()?, &name, force),
    Commands::Template => {
      cmd_template();
      Ok(())
    }
    Commands::Install {
      mode,
      from,
      source_name,
      force,
    } => cmd_install(config()?, mode, from.as_deref(), source_name.as_deref(), force),
  }
}

/// Category of the first library error in the chain, if any.
fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
  err.chain().find_map(|cause| {
    if let Some(e) = cause.downcast_ref::<StoreError>() {
      Some(e.kind())
    } else if let Some(e) = cause.downcast_ref::<InstallError>() {
      Some(e.kind())
    } else if let Some(e) = cause.downcast_ref::<PermissionError>() {
      Some(e.kind())
    } else {
      cause.downcast_ref::<ConfigError>().map(ConfigError::kind)
    }
  })
}

/// Invalid input exits with 2, every other failure with 1.
fn exit_code(kind: Option<ErrorKind>) -> ExitCode {
  match kind {
    Some(ErrorKind::Validation) => ExitCode::from(2),
    _ => ExitCode::FAILURE,
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      let kind = error_kind(&e);
      debug!(kind = ?kind, "command failed");
      print_error(&format!("{:#}", e));
      exit_code(kind)
    }
  }
}
