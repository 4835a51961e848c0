use bzip2::read::MultiBzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::archive::{BZIP2_MAGIC, HIDDEN_MEMBER_PREFIXES, ZSTD_MAGIC};
use crate::errors::LoaderError;
use crate::transport::ArchiveHandle;
use crate::types::MemberPath;

/// Decompressed byte stream feeding the tar reader.
pub type ArchiveStream = Box<dyn Read>;
/// Byte stream of a single member, borrowed from its `ArchiveReader`.
pub type ArchiveEntry<'a> = tar::Entry<'a, ArchiveStream>;

/// Outer compression of a tar archive, detected from its leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Bzip2,
    Zstd,
    None,
}

impl Compression {
    /// Detect compression from the first bytes of a file.
    pub fn sniff(prefix: &[u8]) -> Self {
        if prefix.starts_with(BZIP2_MAGIC) {
            Compression::Bzip2
        } else if prefix.starts_with(ZSTD_MAGIC) {
            Compression::Zstd
        } else {
            Compression::None
        }
    }
}

/// One regular-file member: its stored path and a reader over its content.
#[derive(Debug)]
pub struct ArchiveMember<R> {
    pub path: MemberPath,
    pub stream: R,
}

impl<R> ArchiveMember<R> {
    pub fn new(path: impl Into<MemberPath>, stream: R) -> Self {
        Self {
            path: path.into(),
            stream,
        }
    }
}

/// Owns an open archive file for one sequential pass over its members.
///
/// Dropping the reader closes the file, whether or not iteration finished.
pub struct ArchiveReader {
    path: PathBuf,
    compression: Compression,
    archive: tar::Archive<ArchiveStream>,
    members_taken: bool,
}

impl ArchiveReader {
    /// Open the archive referenced by `handle`.
    pub fn open(handle: &ArchiveHandle) -> Result<Self, LoaderError> {
        Self::open_path(handle.path())
    }

    /// Open a local archive file, sniffing its compression.
    pub fn open_path(path: &Path) -> Result<Self, LoaderError> {
        let archive_error = |reason: String| LoaderError::Archive {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|err| archive_error(err.to_string()))?;
        let mut reader = BufReader::new(file);
        let compression = Compression::sniff(
            reader
                .fill_buf()
                .map_err(|err| archive_error(format!("failed reading header: {err}")))?,
        );
        let stream: ArchiveStream = match compression {
            Compression::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
            Compression::Zstd => Box::new(
                zstd::stream::read::Decoder::with_buffer(reader)
                    .map_err(|err| archive_error(format!("failed starting zstd stream: {err}")))?,
            ),
            Compression::None => Box::new(reader),
        };
        debug!(
            "[allocine:archive] opened {} (compression={:?})",
            path.display(),
            compression
        );
        Ok(Self {
            path: path.to_path_buf(),
            compression,
            archive: tar::Archive::new(stream),
            members_taken: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Lazy sequence of regular-file members in archive order.
    ///
    /// Available once per reader: the underlying stream cannot rewind.
    pub fn members(&mut self) -> Result<ArchiveMembers<'_>, LoaderError> {
        if self.members_taken {
            return Err(LoaderError::Archive {
                path: self.path.clone(),
                reason: "members were already iterated; reopen the archive".to_string(),
            });
        }
        self.members_taken = true;
        let entries = self.archive.entries().map_err(|err| LoaderError::Archive {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        Ok(ArchiveMembers {
            path: self.path.clone(),
            entries,
        })
    }
}

/// Iterator over `(path, stream)` members of an open archive.
///
/// A member's stream must be dropped or exhausted before the next member is
/// requested; unread content is skipped by the tar reader.
pub struct ArchiveMembers<'a> {
    path: PathBuf,
    entries: tar::Entries<'a, ArchiveStream>,
}

impl<'a> Iterator for ArchiveMembers<'a> {
    type Item = Result<ArchiveMember<ArchiveEntry<'a>>, LoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    return Some(Err(LoaderError::Archive {
                        path: self.path.clone(),
                        reason: err.to_string(),
                    }));
                }
            };
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let member_path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            if is_hidden_member(&member_path) {
                debug!("[allocine:archive] skipping hidden member {member_path}");
                continue;
            }
            return Some(Ok(ArchiveMember::new(member_path, entry)));
        }
    }
}

/// True for members whose base name marks them as hidden or OS metadata.
fn is_hidden_member(path: &str) -> bool {
    let base = path.rsplit('/').next().unwrap_or(path);
    HIDDEN_MEMBER_PREFIXES
        .iter()
        .any(|prefix| base.starts_with(prefix))
}
