use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::types::{DatasetName, MemberPath, Url};

/// Error type for download, archive, and record decoding failures.
///
/// Line numbers are zero-based and match the `ExampleId` the line would have
/// produced.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed resolving '{url}': {reason}")]
    Download { url: Url, reason: String },
    #[error("failed opening archive {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },
    #[error("failed reading member '{member}' at line {line}: {source}")]
    MemberRead {
        member: MemberPath,
        line: u64,
        source: io::Error,
    },
    #[error("member '{member}' line {line} is not valid UTF-8: {source}")]
    Decode {
        member: MemberPath,
        line: u64,
        source: FromUtf8Error,
    },
    #[error("member '{member}' line {line} is not a valid record: {source}")]
    Parse {
        member: MemberPath,
        line: u64,
        source: serde_json::Error,
    },
    #[error("unknown split '{0}' (expected train, validation or test)")]
    UnknownSplit(String),
    #[error("dataset '{0}' is already registered")]
    DuplicateDataset(DatasetName),
    #[error("dataset '{0}' is not registered")]
    UnknownDataset(DatasetName),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
