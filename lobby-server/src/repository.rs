//! File repository collaborator
//!
//! A directory of plain files served read-only through `list` and `print`.
//! The server creates the directory at startup if it is missing; what ends
//! up inside it is not this crate's concern.

use std::io;
use std::path::{Path, PathBuf};

/// Read-only view over the repository directory
#[derive(Debug, Clone)]
pub struct FileRepository {
    root: PathBuf,
}

impl FileRepository {
    /// Open the repository, creating the directory if absent
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// The repository directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all entries in the repository, sorted
    pub async fn list(&self) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Contents of the named file, or `None` if no such file exists
    pub async fn read(&self, name: &str) -> io::Result<Option<String>> {
        let path = self.root.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(tokio::fs::read_to_string(&path).await?)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
