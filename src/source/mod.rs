//! Dataset builder interface and split plumbing.
//!
//! Ownership model:
//! - `DatasetBuilder` declares metadata and plans splits; it owns no I/O.
//! - `SplitGenerator` holds a deferred archive reference. Nothing is
//!   downloaded or opened until `open` is called.
//! - `OpenSplit` owns the opened archive for one pass; the example iterator
//!   borrows it, so the file is released when the `OpenSplit` is dropped,
//!   whether or not iteration ran to the end.

use std::fmt;
use std::sync::Arc;

use crate::config::BuilderConfig;
use crate::errors::LoaderError;
use crate::features::DatasetInfo;
use crate::splits::Split;
use crate::transport::{ArchiveEntry, ArchiveMembers, ArchiveReader, DownloadManager};
use crate::types::{MemberPath, Url};

/// Streaming line decoder for split members.
pub mod generator;
/// Built-in dataset builders.
pub mod sources;

pub use generator::{ExampleGenerator, generate_examples};

/// Example iterator over an opened archive.
pub type ArchiveExamples<'a> = ExampleGenerator<ArchiveMembers<'a>, ArchiveEntry<'a>>;

/// Host-facing dataset builder interface.
pub trait DatasetBuilder: Send + Sync {
    /// Builder configuration (name, version, description).
    fn config(&self) -> &BuilderConfig;

    /// Registration name; defaults to the config name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Static dataset metadata. Cannot fail and performs no I/O.
    fn describe(&self) -> DatasetInfo;

    /// Plan one generator per split against `manager`.
    ///
    /// Planning is lazy: the archive is resolved when a generator is opened.
    fn plan_splits(&self, manager: Arc<dyn DownloadManager>) -> Vec<SplitGenerator>;
}

/// Deferred description of how to produce one split.
#[derive(Clone)]
pub struct SplitGenerator {
    split: Split,
    target_path: MemberPath,
    url: Url,
    manager: Arc<dyn DownloadManager>,
}

impl SplitGenerator {
    pub fn new(
        split: Split,
        target_path: impl Into<MemberPath>,
        url: impl Into<Url>,
        manager: Arc<dyn DownloadManager>,
    ) -> Self {
        Self {
            split,
            target_path: target_path.into(),
            url: url.into(),
            manager,
        }
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// Archive member this split is read from.
    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve the archive and open it for one generation pass.
    ///
    /// Download and archive-format errors from the manager are returned
    /// unchanged.
    pub fn open(&self) -> Result<OpenSplit, LoaderError> {
        let handle = self.manager.download(&self.url)?;
        let archive = self.manager.iter_archive(&handle)?;
        Ok(OpenSplit {
            split: self.split,
            target_path: self.target_path.clone(),
            archive,
        })
    }
}

impl fmt::Debug for SplitGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitGenerator")
            .field("split", &self.split)
            .field("target_path", &self.target_path)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// An opened archive scoped to one split's generation pass.
pub struct OpenSplit {
    split: Split,
    target_path: MemberPath,
    archive: ArchiveReader,
}

impl OpenSplit {
    pub fn split(&self) -> Split {
        self.split
    }

    /// Lazy examples for this split. Callable once per `OpenSplit`.
    pub fn examples(&mut self) -> Result<ArchiveExamples<'_>, LoaderError> {
        let members = self.archive.members()?;
        Ok(generate_examples(self.target_path.clone(), members))
    }
}
