//! Recursive search for record files by name prefix.

use std::ffi::OsStr;
use std::path::PathBuf;

use futures::Stream;
use tokio::fs::ReadDir;

use crate::error_handling::FileError;

/// Depth-first walk yielding regular files whose name starts with a prefix.
///
/// Symlinks are never followed. If the root itself is a regular file it is
/// the only candidate.
pub struct PrefixWalker {
    root: Option<PathBuf>,
    prefix: String,
    pending_dirs: Vec<PathBuf>,
    current: Option<(PathBuf, ReadDir)>,
}

impl PrefixWalker {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        PrefixWalker {
            root: Some(root.into()),
            prefix: prefix.into(),
            pending_dirs: Vec::new(),
            current: None,
        }
    }

    /// Returns the next matching path, or `None` once the tree is exhausted.
    ///
    /// # Errors
    ///
    /// Any directory that cannot be read ends the walk with `FileError::Io`.
    pub async fn next_match(&mut self) -> Result<Option<PathBuf>, FileError> {
        if let Some(root) = self.root.take() {
            let meta = tokio::fs::symlink_metadata(&root)
                .await
                .map_err(|source| FileError::Io {
                    path: root.clone(),
                    source,
                })?;
            if meta.is_dir() {
                self.pending_dirs.push(root);
            } else if meta.is_file() && root_matches(&root, &self.prefix) {
                return Ok(Some(root));
            }
        }

        loop {
            let entry = match self.current.as_mut() {
                Some((dir, read_dir)) => {
                    read_dir
                        .next_entry()
                        .await
                        .map_err(|source| FileError::Io {
                            path: dir.clone(),
                            source,
                        })?
                }
                None => None,
            };

            match entry {
                Some(entry) => {
                    let path = entry.path();
                    let file_type = entry.file_type().await.map_err(|source| FileError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    if file_type.is_dir() {
                        self.pending_dirs.push(path);
                    } else if file_type.is_file() && name_matches(&entry.file_name(), &self.prefix)
                    {
                        return Ok(Some(path));
                    }
                }
                None => {
                    self.current = None;
                    let Some(dir) = self.pending_dirs.pop() else {
                        return Ok(None);
                    };
                    let read_dir =
                        tokio::fs::read_dir(&dir)
                            .await
                            .map_err(|source| FileError::Io {
                                path: dir.clone(),
                                source,
                            })?;
                    self.current = Some((dir, read_dir));
                }
            }
        }
    }

    /// Turns the walker into a stream of matching paths.
    pub fn into_stream(self) -> impl Stream<Item = Result<PathBuf, FileError>> {
        futures::stream::try_unfold(self, |mut walker| async move {
            let next = walker.next_match().await?;
            Ok(next.map(|path| (path, walker)))
        })
    }
}

fn name_matches(name: &OsStr, prefix: &str) -> bool {
    name.to_string_lossy().starts_with(prefix)
}

fn root_matches(root: &std::path::Path, prefix: &str) -> bool {
    root.file_name()
        .map(|name| name_matches(name, prefix))
        .unwrap_or(false)
}

/// Collects every matching path under `root`.
pub async fn find_prefixed_files(
    root: impl Into<PathBuf>,
    prefix: &str,
) -> Result<Vec<PathBuf>, FileError> {
    let mut walker = PrefixWalker::new(root, prefix);
    let mut found = Vec::new();
    while let Some(path) = walker.next_match().await? {
        found.push(path);
    }
    Ok(found)
}
