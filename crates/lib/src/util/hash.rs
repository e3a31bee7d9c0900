//! Content hashing for install change detection.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// A full 64-character SHA256 hash of some content.
///
/// The hash is a lowercase hexadecimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub String);

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
  let mut file = fs::File::open(path)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash a file if it exists, `None` otherwise or when it cannot be read.
pub fn hash_file_opt(path: &Path) -> Option<ContentHash> {
  if !path.is_file() {
    return None;
  }
  hash_file(path).ok()
}
