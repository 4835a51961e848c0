use crate::splits::Split;

/// Constants describing the Allocine corpus itself.
pub mod allocine {
    use crate::config::Version;

    /// Builder-config name used for registration.
    pub const CONFIG_NAME: &str = "allocine";
    /// Builder-config version.
    pub const CONFIG_VERSION: Version = Version::new(1, 0, 0);
    /// Short builder-config description.
    pub const CONFIG_DESCRIPTION: &str =
        "Allocine Dataset: A Large-Scale French Movie Reviews Dataset";
    /// Remote archive holding all three splits.
    pub const DOWNLOAD_URL: &str = "https://github.com/TheophileBlard/french-sentiment-analysis-with-bert/raw/master/allocine_dataset/data.tar.bz2";
    /// Project homepage.
    pub const HOMEPAGE: &str = "https://github.com/TheophileBlard/french-sentiment-analysis-with-bert";
    /// Directory inside the archive that holds the split members.
    pub const DATA_DIR: &str = "data";
    /// Member file name for the train split.
    pub const TRAIN_FILE: &str = "train.jsonl";
    /// Member file name for the validation split.
    pub const VAL_FILE: &str = "val.jsonl";
    /// Member file name for the test split.
    pub const TEST_FILE: &str = "test.jsonl";

    /// Long-form dataset description.
    pub const DESCRIPTION: &str = " Allocine Dataset: A Large-Scale French Movie Reviews Dataset.
 This is a dataset for binary sentiment classification, made of user reviews scraped from Allocine.fr.
 It contains 100k positive and 100k negative reviews divided into 3 balanced splits: train (160k reviews), val (20k) and test (20k).
";

    /// BibTeX citation.
    pub const CITATION: &str = r"@misc{blard2019allocine,
  author = {Blard, Theophile},
  title = {french-sentiment-analysis-with-bert},
  year = {2020},
  publisher = {GitHub},
  journal = {GitHub repository},
  howpublished={\url{https://github.com/TheophileBlard/french-sentiment-analysis-with-bert}},
}
";
}

/// Constants naming record fields and label categories.
pub mod features {
    /// Free-text review column, both in source lines and in produced examples.
    pub const REVIEW_FIELD: &str = "review";
    /// Categorical label column in produced examples.
    pub const LABEL_FIELD: &str = "label";
    /// Source-line field holding the integer sentiment.
    pub const POLARITY_FIELD: &str = "polarity";
    /// Label category for negative reviews (class id 0).
    pub const NEG: &str = "neg";
    /// Label category for positive reviews (class id 1).
    pub const POS: &str = "pos";
    /// Declared class names, in class-id order.
    pub const LABEL_NAMES: [&str; 2] = [NEG, POS];
    /// Dtype tag for free-form string values.
    pub const STRING_DTYPE: &str = "string";
}

/// Constants used by split naming and documented sizes.
pub mod splits {
    use super::Split;

    /// Canonical split iteration order.
    pub const ALL_SPLITS: [Split; 3] = [Split::Train, Split::Validation, Split::Test];
    /// Documented train-split size (not enforced).
    pub const TRAIN_EXAMPLES: u64 = 160_000;
    /// Documented validation-split size (not enforced).
    pub const VALIDATION_EXAMPLES: u64 = 20_000;
    /// Documented test-split size (not enforced).
    pub const TEST_EXAMPLES: u64 = 20_000;
}

/// Constants used by download managers and the archive cache.
pub mod download {
    /// Default directory for cached archives.
    pub const DEFAULT_CACHE_DIR: &str = ".allocine_cache";
    /// Environment variable overriding the cache directory.
    pub const CACHE_DIR_ENV: &str = "ALLOCINE_CACHE_DIR";
    /// Suffix appended to the cache file while a download is in flight.
    pub const PARTIAL_EXTENSION: &str = "part";
    /// Suffix appended to the cache file for its JSON sidecar.
    pub const SIDECAR_SUFFIX: &str = ".download.json";
    /// Version tag stored in download sidecars.
    pub const SIDECAR_VERSION: u32 = 1;
    /// Read buffer size used while streaming a download to disk.
    pub const DOWNLOAD_BUFFER_BYTES: usize = 1024 * 1024;
    /// Default seconds between download progress log lines.
    pub const PROGRESS_INTERVAL_SECS: u64 = 2;
    /// Fallback file name when a URL has no usable last path segment.
    pub const FALLBACK_ARCHIVE_NAME: &str = "archive";
}

/// Magic-byte prefixes used to sniff archive compression.
pub mod archive {
    /// bzip2 stream header.
    pub const BZIP2_MAGIC: &[u8] = b"BZh";
    /// zstd frame header.
    pub const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];
    /// Base-name prefixes for members that are never yielded.
    pub const HIDDEN_MEMBER_PREFIXES: [&str; 2] = [".", "__"];
}
