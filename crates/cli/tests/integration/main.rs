mod common;
mod install_tests;
mod script_tests;
