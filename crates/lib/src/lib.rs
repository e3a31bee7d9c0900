//! binly-lib: Core types and logic for binly
//!
//! This crate manages a personal directory of small executable commands:
//! - `store`: enumerate, read, write and delete entries in the bin directory
//! - `platform::permissions`: toggle and query run permission
//! - `wrapper`: generate forwarding wrappers and authoring templates
//! - `install`: deploy binly itself into the bin directory

pub mod config;
pub mod consts;
pub mod error;
pub mod install;
pub mod platform;
pub mod store;
pub mod util;
pub mod wrapper;

pub use config::Config;
pub use error::ErrorKind;
