//! Platform-specific filesystem locations and permission handling.

pub mod paths;
pub mod permissions;

pub use permissions::{PermissionError, is_executable, set_executable};
