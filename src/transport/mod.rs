//! Download-manager contract and its built-in implementations.
//!
//! A download manager resolves a URL to a local `ArchiveHandle` and opens
//! handles as lazily-read archives. Loaders only talk to the trait, so the
//! same split plan works against the network cache or a local file.

use std::path::{Path, PathBuf};

use crate::errors::LoaderError;
use crate::types::Url;

/// Streaming tar reader over a local archive.
pub mod archive;
/// Local-file download manager.
pub mod fs;
/// HTTP download manager with an on-disk cache.
pub mod http;

pub use archive::{ArchiveEntry, ArchiveMember, ArchiveMembers, ArchiveReader, Compression};
pub use fs::LocalDownloadManager;
pub use http::HttpDownloadManager;

/// Resolved archive location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveHandle {
    /// URL the handle was resolved from.
    pub url: Url,
    /// Local file holding the archive bytes.
    pub path: PathBuf,
}

impl ArchiveHandle {
    pub fn new(url: impl Into<Url>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Collaborator that resolves remote archives and opens them for streaming.
///
/// Both calls may block on network or disk I/O. Errors are returned as-is to
/// the split being generated; implementations do not retry.
pub trait DownloadManager: Send + Sync {
    /// Resolve `url` to a local archive handle.
    fn download(&self, url: &str) -> Result<ArchiveHandle, LoaderError>;

    /// Open `handle` for a single lazy pass over its members.
    fn iter_archive(&self, handle: &ArchiveHandle) -> Result<ArchiveReader, LoaderError> {
        ArchiveReader::open(handle)
    }
}
