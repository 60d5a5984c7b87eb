// SPDX-License-Identifier: MPL-2.0
//! Registry of local files selected by the user.
//!
//! Each registration yields a fresh [`ImageId`] of the form `dicomfile:<index>`,
//! even when the same path is registered twice. The id is what the rest of the
//! viewer passes around; the path is only looked up when a decode starts.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Scheme prefix of identifiers produced by [`FileManager::add`].
pub const SCHEME: &str = "dicomfile";

/// Identifier of a registered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(usize);

impl ImageId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SCHEME, self.0)
    }
}

impl FromStr for ImageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, index) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidImageId(s.to_string()))?;
        if scheme != SCHEME {
            return Err(Error::InvalidImageId(s.to_string()));
        }
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidImageId(s.to_string()));
        }
        index
            .parse::<usize>()
            .map(ImageId)
            .map_err(|_| Error::InvalidImageId(s.to_string()))
    }
}

/// Holds the paths of registered files, indexed by [`ImageId`].
#[derive(Debug, Default)]
pub struct FileManager {
    files: Vec<Option<PathBuf>>,
}

impl FileManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file and returns its identifier.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> ImageId {
        self.files.push(Some(path.into()));
        ImageId(self.files.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: &ImageId) -> Option<&Path> {
        self.files.get(id.0).and_then(|entry| entry.as_deref())
    }

    /// Forgets a single file. Other identifiers stay valid.
    pub fn remove(&mut self, id: &ImageId) -> Option<PathBuf> {
        self.files.get_mut(id.0).and_then(Option::take)
    }

    /// Forgets every file. Indices start again from zero.
    pub fn purge(&mut self) {
        self.files.clear();
    }

    /// Number of files currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.iter().filter(|entry| entry.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_increasing_ids() {
        let mut files = FileManager::new();
        let first = files.add("/scans/a.dcm");
        let second = files.add("/scans/b.dcm");

        assert_eq!(first.to_string(), "dicomfile:0");
        assert_eq!(second.to_string(), "dicomfile:1");
        assert_eq!(files.get(&first), Some(Path::new("/scans/a.dcm")));
        assert_eq!(files.get(&second), Some(Path::new("/scans/b.dcm")));
    }

    #[test]
    fn same_path_registered_twice_gets_two_ids() {
        let mut files = FileManager::new();
        let first = files.add("/scans/a.dcm");
        let again = files.add("/scans/a.dcm");
        assert_ne!(first, again);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn remove_keeps_other_ids_valid() {
        let mut files = FileManager::new();
        let first = files.add("/scans/a.dcm");
        let second = files.add("/scans/b.dcm");

        assert_eq!(files.remove(&first), Some(PathBuf::from("/scans/a.dcm")));
        assert!(files.get(&first).is_none());
        assert!(files.get(&second).is_some());
        assert!(files.remove(&first).is_none());
    }

    #[test]
    fn purge_clears_and_restarts_numbering() {
        let mut files = FileManager::new();
        files.add("/scans/a.dcm");
        files.add("/scans/b.dcm");
        files.purge();

        assert!(files.is_empty());
        assert_eq!(files.add("/scans/c.dcm").index(), 0);
    }

    #[test]
    fn image_id_parses_its_display_form() {
        let id: ImageId = "dicomfile:42".parse().expect("valid id");
        assert_eq!(id.index(), 42);
        assert_eq!(id.to_string(), "dicomfile:42");
    }

    #[test]
    fn image_id_rejects_other_schemes_and_garbage() {
        for raw in ["wadouri:1", "dicomfile:", "dicomfile:-1", "dicomfile:x", "42"] {
            match raw.parse::<ImageId>() {
                Err(Error::InvalidImageId(value)) => assert_eq!(value, raw),
                other => panic!("expected InvalidImageId for {raw}, got {:?}", other),
            }
        }
    }
}
