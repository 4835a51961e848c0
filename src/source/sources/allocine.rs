use std::io::Read;
use std::sync::Arc;

use crate::config::BuilderConfig;
use crate::constants::allocine::{CITATION, CONFIG_NAME, DESCRIPTION, DOWNLOAD_URL, HOMEPAGE};
use crate::constants::features::{LABEL_FIELD, LABEL_NAMES, REVIEW_FIELD, STRING_DTYPE};
use crate::errors::LoaderError;
use crate::features::{ClassLabel, DatasetInfo, Feature, TaskTemplate};
use crate::source::{DatasetBuilder, ExampleGenerator, SplitGenerator, generate_examples};
use crate::splits::{ALL_SPLITS, SplitInfo};
use crate::transport::{ArchiveMember, DownloadManager};
use crate::types::{MemberPath, Url};

/// Builder for the Allocine French movie-review sentiment corpus.
///
/// All three splits live in one `tar.bz2` archive as JSON-lines members
/// (`data/train.jsonl`, `data/val.jsonl`, `data/test.jsonl`).
#[derive(Clone, Debug)]
pub struct Allocine {
    config: BuilderConfig,
    url: Url,
}

impl Default for Allocine {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocine {
    /// Builder pointing at the published archive.
    pub fn new() -> Self {
        Self {
            config: BuilderConfig::default(),
            url: DOWNLOAD_URL.to_string(),
        }
    }

    /// Override the archive URL (mirrors, local test fixtures).
    pub fn with_url(mut self, url: impl Into<Url>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stream `(id, example)` pairs for `target_path` out of `members`.
    pub fn generate<I, R>(
        target_path: impl Into<MemberPath>,
        members: I,
    ) -> ExampleGenerator<I::IntoIter, R>
    where
        I: IntoIterator<Item = Result<ArchiveMember<R>, LoaderError>>,
        R: Read,
    {
        generate_examples(target_path, members)
    }
}

impl DatasetBuilder for Allocine {
    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn describe(&self) -> DatasetInfo {
        let mut info = DatasetInfo::for_config(CONFIG_NAME, &self.config);
        info.description = DESCRIPTION.to_string();
        info.citation = CITATION.to_string();
        info.homepage = HOMEPAGE.to_string();
        info.features
            .insert(REVIEW_FIELD.to_string(), Feature::value(STRING_DTYPE));
        info.features.insert(
            LABEL_FIELD.to_string(),
            Feature::ClassLabel(ClassLabel::new(LABEL_NAMES)),
        );
        info.task_templates = vec![TaskTemplate::TextClassification {
            text_column: REVIEW_FIELD.to_string(),
            label_column: LABEL_FIELD.to_string(),
        }];
        info.splits = ALL_SPLITS.into_iter().map(SplitInfo::from).collect();
        info
    }

    fn plan_splits(&self, manager: Arc<dyn DownloadManager>) -> Vec<SplitGenerator> {
        ALL_SPLITS
            .into_iter()
            .map(|split| {
                SplitGenerator::new(split, split.member_path(), self.url.clone(), manager.clone())
            })
            .collect()
    }
}
