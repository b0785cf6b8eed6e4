use crate::error::{IndexerError, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Enumerates every regular file below a root directory.
///
/// Nothing is filtered here: hidden files and unsupported extensions are
/// returned too, grammar resolution happens per file downstream. Symlinks
/// are not followed.
pub struct FileCollector {
    root: PathBuf,
}

impl FileCollector {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Collect all files, sorted by name within each directory.
    ///
    /// The first unreadable entry aborts the collection with an
    /// [`IndexerError::IoError`] naming that path.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let meta = std::fs::metadata(&self.root).map_err(|e| IndexerError::io(&self.root, e))?;
        if !meta.is_dir() {
            return Err(IndexerError::io(
                &self.root,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();
        let files = self.gather(walker)?;

        log::info!("Found {} files under {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Regular files from a walk, stopping at the first failed entry
    fn gather<I>(&self, entries: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = walkdir::Result<DirEntry>>,
    {
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map_or_else(|| self.root.clone(), Path::to_path_buf);
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("filesystem loop"));
                IndexerError::io(path, source)
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Path relative to the root with `/` separators
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut normalized = relative.to_string_lossy().to_string();
        if normalized.contains('\\') {
            normalized = normalized.replace('\\', "/");
        }
        normalized
    }
}
