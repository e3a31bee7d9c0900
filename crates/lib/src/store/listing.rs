//! Lazy, restartable enumeration of store entries.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{ScriptStore, StoreError};

/// Entry names of a store matching a filter.
///
/// Nothing is read until the listing is iterated, and each iteration scans
/// the directory again.
pub struct Listing<'a> {
  store: &'a ScriptStore,
  filter: String,
}

impl<'a> Listing<'a> {
  pub(super) fn new(store: &'a ScriptStore, filter: &str) -> Self {
    Self {
      store,
      filter: filter.to_lowercase(),
    }
  }

  pub fn iter(&self) -> Entries<'a> {
    let walker = WalkDir::new(self.store.dir())
      .min_depth(1)
      .max_depth(1)
      .sort_by_file_name()
      .into_iter();

    Entries {
      store: self.store,
      filter: self.filter.clone(),
      walker,
    }
  }

  /// Collect every matching name, stopping at the first scan error.
  pub fn names(&self) -> Result<Vec<String>, StoreError> {
    self.iter().collect()
  }
}

impl<'a> IntoIterator for &Listing<'a> {
  type Item = Result<String, StoreError>;
  type IntoIter = Entries<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Iterator over one scan of the bin directory, in lexicographic order.
pub struct Entries<'a> {
  store: &'a ScriptStore,
  filter: String,
  walker: walkdir::IntoIter,
}

impl Iterator for Entries<'_> {
  type Item = Result<String, StoreError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let entry = match self.walker.next()? {
        Ok(entry) => entry,
        Err(e) => {
          return Some(Err(StoreError::List {
            path: self.store.dir().display().to_string(),
            source: e,
          }));
        }
      };

      let Some(name) = entry.file_name().to_str() else {
        debug!(path = ?entry.path(), "skipping non UTF-8 file name");
        continue;
      };

      if self.store.config().is_reserved(name) {
        continue;
      }

      if !is_regular_file(entry.path(), entry.file_type()) {
        continue;
      }

      if !self.filter.is_empty() && !name.to_lowercase().contains(&self.filter) {
        continue;
      }

      return Some(Ok(name.to_string()));
    }
  }
}

/// Regular files and symlinks resolving to regular files.
fn is_regular_file(path: &Path, file_type: fs::FileType) -> bool {
  if file_type.is_file() {
    return true;
  }
  if file_type.is_symlink() {
    return fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
  }
  false
}
