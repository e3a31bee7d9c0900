/// Name of the deployed command and of the application directories.
pub const APP_NAME: &str = "binly";

/// Overrides the bin directory.
pub const BIN_DIR_ENV: &str = "BINLY_BIN_DIR";

/// Forces the installer mode (`source` or `packaged`).
pub const INSTALL_MODE_ENV: &str = "BINLY_INSTALL_MODE";

/// Run bits for owner, group and other.
pub const RUN_BITS: u32 = 0o111;

/// Interpreter directive used by generated scripts.
pub const SHEBANG: &str = "#!/bin/sh";
