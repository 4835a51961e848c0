#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Builder and download configuration types.
pub mod config;
/// Centralized constants for the corpus, splits, downloads, and archives.
pub mod constants;
/// Example and label types.
pub mod data;
/// Reusable example runners shared by demo binaries.
pub mod example_apps;
/// Dataset metadata and feature schema.
pub mod features;
/// Explicit dataset registration.
pub mod registry;
/// Dataset builder trait, split plumbing, and built-in builders.
pub mod source;
/// Split names, member paths, and documented sizes.
pub mod splits;
/// Download managers and archive readers.
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{BuilderConfig, DownloadConfig, Version};
pub use data::{Example, Label, RawRecord};
pub use errors::LoaderError;
pub use features::{ClassLabel, DatasetInfo, Feature, Features, SupervisedKeys, TaskTemplate};
pub use registry::DatasetRegistry;
pub use source::sources::allocine::Allocine;
pub use source::{
    ArchiveExamples, DatasetBuilder, ExampleGenerator, OpenSplit, SplitGenerator,
    generate_examples,
};
pub use splits::{ALL_SPLITS, Split, SplitInfo};
pub use transport::{
    ArchiveHandle, ArchiveMember, ArchiveReader, Compression, DownloadManager,
    HttpDownloadManager, LocalDownloadManager,
};
pub use types::{ClassName, DatasetName, ExampleId, FeatureName, MemberPath, Url};
