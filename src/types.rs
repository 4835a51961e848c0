/// Per-split zero-based example identifier (the line index within a member).
/// Example: `0`, `159999`
pub type ExampleId = u64;
/// Path of a member inside an archive, exactly as stored in the tar header.
/// Examples: `data/train.jsonl`, `data/val.jsonl`
pub type MemberPath = String;
/// Registered dataset / builder-config name.
/// Example: `allocine`
pub type DatasetName = String;
/// Remote resource address resolved by a download manager.
/// Example: `https://github.com/TheophileBlard/french-sentiment-analysis-with-bert/raw/master/allocine_dataset/data.tar.bz2`
pub type Url = String;
/// Feature (column) name in a dataset schema.
/// Examples: `review`, `label`
pub type FeatureName = String;
/// Category name declared by a class-label feature.
/// Examples: `neg`, `pos`
pub type ClassName = String;
