use std::fs;

use allocine::{Allocine, DatasetBuilder, DatasetInfo, DatasetRegistry, Label};
use serde_json::Value;

#[test]
fn written_info_round_trips_and_keeps_hub_layout() {
    let temp = tempfile::tempdir().expect("failed creating tempdir");
    let info = Allocine::new().describe();

    let path = info
        .write_to_dir(&temp.path().join("nested/out"))
        .expect("info should be written");
    assert!(path.ends_with("dataset_info.json"));

    let raw = fs::read_to_string(&path).unwrap();
    let decoded: DatasetInfo = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, info);

    let json: Value = serde_json::from_str(&raw).unwrap();
    let feature_names: Vec<&str> = json["features"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(feature_names, vec!["review", "label"]);
    assert_eq!(json["features"]["label"]["_type"], "ClassLabel");
    assert_eq!(json["task_templates"][0]["task"], "text-classification");
    assert_eq!(json["splits"][0]["name"], "train");
    assert_eq!(json["splits"][0]["num_examples"], 160_000);
}

#[test]
fn label_class_ids_follow_declared_names() {
    let info = Allocine::new().describe();
    let labels = info.class_label("label").expect("label feature");
    for label in [Label::Neg, Label::Pos] {
        assert_eq!(labels.str2int(label.as_str()), Some(label.class_id()));
    }
    assert!(info.class_label("review").is_none());
}

#[test]
fn registry_describes_builtin_dataset_by_name() {
    let registry = DatasetRegistry::with_builtin();
    let builder = registry.get("allocine").expect("builtin registered");
    let info = builder.describe();
    assert_eq!(info.config_name, "allocine");
    assert_eq!(info.version.to_string(), "1.0.0");
    assert_eq!(
        info.splits.iter().map(|split| split.num_examples).sum::<u64>(),
        200_000
    );
}
