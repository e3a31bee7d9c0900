use binly_lib::wrapper::manual_template;

/// Print the skeleton new commands start from.
pub fn cmd_template() {
  print!("{}", manual_template());
}
