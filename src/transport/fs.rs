use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::LoaderError;
use crate::transport::{ArchiveHandle, DownloadManager};
use crate::types::Url;

/// Offline download manager that maps URLs onto archives already on disk.
///
/// Useful for air-gapped runs (point the loader's URL at a manually fetched
/// archive) and for tests.
#[derive(Clone, Debug, Default)]
pub struct LocalDownloadManager {
    archives: HashMap<Url, PathBuf>,
    fallback: Option<PathBuf>,
}

impl LocalDownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `url` to the local archive at `path`.
    pub fn with_archive(mut self, url: impl Into<Url>, path: impl Into<PathBuf>) -> Self {
        self.insert(url, path);
        self
    }

    /// Serve the archive at `path` for every URL without an explicit mapping.
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback = Some(path.into());
        self
    }

    /// Map `url` to the local archive at `path`, replacing any previous mapping.
    pub fn insert(&mut self, url: impl Into<Url>, path: impl Into<PathBuf>) {
        self.archives.insert(url.into(), path.into());
    }
}

impl DownloadManager for LocalDownloadManager {
    fn download(&self, url: &str) -> Result<ArchiveHandle, LoaderError> {
        let path = self
            .archives
            .get(url)
            .or(self.fallback.as_ref())
            .ok_or_else(|| LoaderError::Download {
                url: url.to_string(),
                reason: "no local archive registered for this URL".to_string(),
            })?;
        if !path.is_file() {
            return Err(LoaderError::Download {
                url: url.to_string(),
                reason: format!("local archive {} does not exist", path.display()),
            });
        }
        Ok(ArchiveHandle::new(url, path.clone()))
    }
}
