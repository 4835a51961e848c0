//! Dataset metadata: feature schema, task templates, and `DatasetInfo`.
//!
//! The JSON shape matches the `dataset_info.json` layout consumed by dataset
//! hubs: features are tagged with `_type`, task templates with `task`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{BuilderConfig, Version};
use crate::errors::LoaderError;
use crate::splits::SplitInfo;
use crate::types::{ClassName, DatasetName, FeatureName};

/// File name written by `DatasetInfo::write_to_dir`.
pub const DATASET_INFO_FILENAME: &str = "dataset_info.json";

/// Type of a single column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Feature {
    /// Scalar value with a dtype tag such as `string`.
    Value { dtype: String },
    /// Categorical value drawn from a fixed, ordered name set.
    ClassLabel(ClassLabel),
}

impl Feature {
    pub fn value(dtype: impl Into<String>) -> Self {
        Feature::Value {
            dtype: dtype.into(),
        }
    }
}

/// Ordered set of category names; a name's position is its class id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub names: Vec<ClassName>,
}

impl ClassLabel {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ClassName>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    /// Class id for `name`, if declared.
    pub fn str2int(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Category name for class id `id`, if in range.
    pub fn int2str(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }
}

/// Column name to feature type, in declaration order.
pub type Features = IndexMap<FeatureName, Feature>;

/// Input/output column pairing for supervised `(input, target)` access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisedKeys {
    pub input: FeatureName,
    pub output: FeatureName,
}

/// Task template binding dataset columns to a standard task schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task")]
pub enum TaskTemplate {
    #[serde(rename = "text-classification")]
    TextClassification {
        text_column: FeatureName,
        label_column: FeatureName,
    },
}

/// Static dataset metadata returned by `DatasetBuilder::describe`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub builder_name: DatasetName,
    pub config_name: DatasetName,
    pub version: Version,
    pub description: String,
    pub citation: String,
    pub homepage: String,
    pub features: Features,
    pub supervised_keys: Option<SupervisedKeys>,
    pub task_templates: Vec<TaskTemplate>,
    /// Documented split sizes.
    pub splits: Vec<SplitInfo>,
}

impl DatasetInfo {
    /// Start an info block for `config` with empty metadata.
    pub fn for_config(builder_name: impl Into<DatasetName>, config: &BuilderConfig) -> Self {
        Self {
            builder_name: builder_name.into(),
            config_name: config.name.clone(),
            version: config.version,
            description: String::new(),
            citation: String::new(),
            homepage: String::new(),
            features: Features::new(),
            supervised_keys: None,
            task_templates: Vec::new(),
            splits: Vec::new(),
        }
    }

    /// Class-label feature declared under `column`, if any.
    pub fn class_label(&self, column: &str) -> Option<&ClassLabel> {
        match self.features.get(column) {
            Some(Feature::ClassLabel(label)) => Some(label),
            _ => None,
        }
    }

    /// Write `dataset_info.json` under `dir`, creating the directory if needed.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, LoaderError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(DATASET_INFO_FILENAME);
        let payload = serde_json::to_vec_pretty(self).map_err(|err| {
            LoaderError::Configuration(format!("failed encoding dataset info: {err}"))
        })?;
        fs::write(&path, payload)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_label_maps_names_and_ids() {
        let label = ClassLabel::new(["neg", "pos"]);
        assert_eq!(label.num_classes(), 2);
        assert_eq!(label.str2int("pos"), Some(1));
        assert_eq!(label.str2int("neutral"), None);
        assert_eq!(label.int2str(0), Some("neg"));
        assert_eq!(label.int2str(2), None);
    }

    #[test]
    fn features_serialize_with_type_tags_in_order() {
        let mut features = Features::new();
        features.insert("review".into(), Feature::value("string"));
        features.insert(
            "label".into(),
            Feature::ClassLabel(ClassLabel::new(["neg", "pos"])),
        );
        let encoded = serde_json::to_string(&features).unwrap();
        assert_eq!(
            encoded,
            r#"{"review":{"_type":"Value","dtype":"string"},"label":{"_type":"ClassLabel","names":["neg","pos"]}}"#
        );
    }

    #[test]
    fn task_template_uses_hub_tag() {
        let template = TaskTemplate::TextClassification {
            text_column: "review".into(),
            label_column: "label".into(),
        };
        assert_eq!(
            serde_json::to_value(&template).unwrap(),
            json!({"task": "text-classification", "text_column": "review", "label_column": "label"})
        );
    }
}
