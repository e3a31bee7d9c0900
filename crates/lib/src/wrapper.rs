//! Script text generation.
//!
//! Generated scripts are POSIX `sh`: an interpreter directive followed by a
//! single `exec` line that forwards `"$@"` untouched.

use std::path::Path;

use crate::consts::SHEBANG;

/// Quote a word for a POSIX shell.
///
/// The word is wrapped in single quotes; embedded single quotes become `'\''`.
pub fn shell_quote(word: &str) -> String {
  let mut quoted = String::with_capacity(word.len() + 2);
  quoted.push('\'');
  for c in word.chars() {
    if c == '\'' {
      quoted.push_str("'\\''");
    } else {
      quoted.push(c);
    }
  }
  quoted.push('\'');
  quoted
}

/// A wrapper that runs `target` with every argument it receives.
pub fn auto_wrapper(target: &Path) -> String {
  format!(
    "{}\nexec {} \"$@\"\n",
    SHEBANG,
    shell_quote(&target.to_string_lossy())
  )
}

/// Skeleton for freeform authoring. Never written to disk by this module.
pub fn manual_template() -> String {
  format!("{}\n\n", SHEBANG)
}

/// A wrapper that runs `script` through `interpreter`, forwarding all arguments.
///
/// Each interpreter word is quoted on its own so `/usr/bin/env python3` keeps
/// working.
pub fn interpreter_wrapper<S: AsRef<str>>(interpreter: &[S], script: &Path) -> String {
  let mut line = String::from("exec");
  for word in interpreter {
    line.push(' ');
    line.push_str(&shell_quote(word.as_ref()));
  }
  line.push(' ');
  line.push_str(&shell_quote(&script.to_string_lossy()));
  line.push_str(" \"$@\"");

  format!("{}\n{}\n", SHEBANG, line)
}

/// Parse the interpreter directive of a script into its words.
///
/// Returns `None` when the content has no `#!` line or the line is empty.
pub fn shebang_interpreter(content: &str) -> Option<Vec<String>> {
  let first = content.lines().next()?;
  let directive = first.strip_prefix("#!")?;
  let words: Vec<String> = directive.split_whitespace().map(str::to_string).collect();
  if words.is_empty() { None } else { Some(words) }
}
