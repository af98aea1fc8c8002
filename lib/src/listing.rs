use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::{Chainable, ErrorKind, Result};

/// One direct entry of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub file_name: String,
    pub is_dir: bool,
}

/// Enumerates the direct entries of a directory.
///
/// Implementations return entries sorted by file name and fail with
/// [`ErrorKind::Discovery`] when `path` cannot be listed.
pub trait DirectoryLister: Send + Sync + Debug {
    fn list(&self, path: &Path) -> Result<Vec<Listing>>;
}

impl Listing {
    pub fn file(name: impl Into<String>) -> Self {
        Listing { file_name: name.into(), is_dir: false }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Listing { file_name: name.into(), is_dir: true }
    }

    /// File name without the extension.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((left, _)) => left,
            None => &self.file_name,
        }
    }

    /// The last extension, if any.
    pub fn file_ext(&self) -> Option<&str> {
        self.file_name.rsplit_once('.').map(|(_, right)| right)
    }
}

/// Lists directories on the real file system. Hidden entries are included.
///
/// Symlinks are not followed: a link, even to a directory or a missing target,
/// is listed as a non-directory entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, path: &Path) -> Result<Vec<Listing>> {
        use jwalk::WalkDir;

        let metadata = fs::metadata(path)
            .chain_with(|| error! {
                "failed to list directory",
                "path" => path.display(),
            })
            .with_kind(ErrorKind::Discovery)?;

        if !metadata.is_dir() {
            return Err(error! {
                "path is not a directory",
                "path" => path.display(),
            }.with_kind(ErrorKind::Discovery));
        }

        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false);

        let mut listings = vec![];
        for entry in walker {
            let entry = entry
                .chain_with(|| error! {
                    "failed to read directory entry",
                    "directory" => path.display(),
                })
                .with_kind(ErrorKind::Discovery)?;

            listings.push(Listing {
                file_name: entry.file_name.to_string_lossy().into_owned(),
                is_dir: entry.file_type.is_dir(),
            });
        }

        tracing::trace!(path = %path.display(), entries = listings.len(), "listed directory");
        Ok(listings)
    }
}

/// An in-memory directory tree keyed by directory path.
#[derive(Debug, Default, Clone)]
pub struct MemoryLister {
    dirs: FxHashMap<PathBuf, Vec<Listing>>,
}

impl MemoryLister {
    pub fn new() -> Self {
        MemoryLister::default()
    }

    /// Registers `dir` with the given entries, replacing any previous ones.
    pub fn with_dir<P, I>(mut self, dir: P, entries: I) -> Self
        where P: Into<PathBuf>, I: IntoIterator<Item = Listing>
    {
        self.dirs.insert(dir.into(), entries.into_iter().collect());
        self
    }
}

impl DirectoryLister for MemoryLister {
    fn list(&self, path: &Path) -> Result<Vec<Listing>> {
        let mut listings = self.dirs.get(path)
            .cloned()
            .ok_or_else(|| error! {
                "failed to list directory",
                "path" => path.display(),
            }.with_kind(ErrorKind::Discovery))?;

        listings.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(listings)
    }
}
