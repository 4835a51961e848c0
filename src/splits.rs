use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::allocine::{DATA_DIR, TEST_FILE, TRAIN_FILE, VAL_FILE};
use crate::constants::splits::{TEST_EXAMPLES, TRAIN_EXAMPLES, VALIDATION_EXAMPLES};
use crate::errors::LoaderError;
use crate::types::MemberPath;

pub use crate::constants::splits::ALL_SPLITS;

/// Pre-split dataset partitions shipped in the archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training split.
    Train,
    /// Validation split.
    Validation,
    /// Test split.
    Test,
}

impl Split {
    /// Canonical split name (`train`, `validation`, `test`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "validation",
            Split::Test => "test",
        }
    }

    /// Member file name inside the archive's data directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Split::Train => TRAIN_FILE,
            Split::Validation => VAL_FILE,
            Split::Test => TEST_FILE,
        }
    }

    /// Full member path inside the archive, e.g. `data/val.jsonl`.
    pub fn member_path(&self) -> MemberPath {
        format!("{DATA_DIR}/{}", self.file_name())
    }

    /// Documented number of examples in this split.
    ///
    /// Informational only; generation never checks it.
    pub const fn expected_examples(&self) -> u64 {
        match self {
            Split::Train => TRAIN_EXAMPLES,
            Split::Validation => VALIDATION_EXAMPLES,
            Split::Test => TEST_EXAMPLES,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = LoaderError;

    /// Accepts canonical names plus the `val` / `valid` aliases.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "validation" | "val" | "valid" => Ok(Split::Validation),
            "test" => Ok(Split::Test),
            _ => Err(LoaderError::UnknownSplit(raw.to_string())),
        }
    }
}

/// Declared split name and documented size, as reported in `DatasetInfo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInfo {
    /// Split name.
    pub name: Split,
    /// Documented example count.
    pub num_examples: u64,
}

impl From<Split> for SplitInfo {
    fn from(split: Split) -> Self {
        Self {
            name: split,
            num_examples: split.expected_examples(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_paths_match_archive_layout() {
        assert_eq!(Split::Train.member_path(), "data/train.jsonl");
        assert_eq!(Split::Validation.member_path(), "data/val.jsonl");
        assert_eq!(Split::Test.member_path(), "data/test.jsonl");
    }

    #[test]
    fn documented_sizes_sum_to_corpus_size() {
        let total: u64 = ALL_SPLITS.iter().map(Split::expected_examples).sum();
        assert_eq!(total, 200_000);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!(" Validation ".parse::<Split>().unwrap(), Split::Validation);
        assert_eq!("val".parse::<Split>().unwrap(), Split::Validation);
        assert_eq!("TEST".parse::<Split>().unwrap(), Split::Test);
        assert!(matches!(
            "dev".parse::<Split>(),
            Err(LoaderError::UnknownSplit(name)) if name == "dev"
        ));
    }

    #[test]
    fn serializes_as_lowercase_name() {
        let encoded = serde_json::to_string(&Split::Validation).unwrap();
        assert_eq!(encoded, "\"validation\"");
        assert_eq!(Split::Test.to_string(), "test");
    }
}
