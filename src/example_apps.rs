use std::collections::BTreeMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, ValueEnum, error::ErrorKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::DownloadConfig;
use crate::constants::allocine::CONFIG_NAME;
use crate::data::{Example, Label};
use crate::registry::DatasetRegistry;
use crate::source::SplitGenerator;
use crate::splits::{ALL_SPLITS, Split};
use crate::transport::{DownloadManager, HttpDownloadManager, LocalDownloadManager};
use crate::types::ExampleId;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for Split {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::Train => Split::Train,
            SplitArg::Validation => Split::Validation,
            SplitArg::Test => Split::Test,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "allocine_demo",
    disable_help_subcommand = true,
    about = "Preview or export dataset splits",
    long_about = "Resolve the dataset archive, stream the selected splits, print a preview, and optionally export every split as JSON lines.",
    after_help = "Without --export-dir or --count, each split stops reading after the preview."
)]
/// CLI for `allocine_demo`.
///
/// Common usage:
/// - Preview three examples per split: `allocine_demo`
/// - Count one split: `--split validation --count`
/// - Use an archive already on disk: `--archive ./data.tar.bz2`
/// - Export everything: `--export-dir ./allocine_jsonl`
struct AllocineDemoCli {
    #[arg(long, default_value = CONFIG_NAME, help = "Registered dataset name")]
    dataset: String,
    #[arg(
        long = "split",
        value_enum,
        help = "Split to read, repeat as needed (default: all splits)"
    )]
    splits: Vec<SplitArg>,
    #[arg(
        long,
        default_value_t = 3,
        help = "Number of examples to print per split"
    )]
    limit: usize,
    #[arg(
        long,
        help = "Read each selected split to the end and report counts"
    )]
    count: bool,
    #[arg(
        long = "export-dir",
        value_name = "DIR",
        help = "Write <split>.jsonl files and dataset_info.json into DIR"
    )]
    export_dir: Option<PathBuf>,
    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        help = "Archive cache directory (default: $ALLOCINE_CACHE_DIR or .allocine_cache)"
    )]
    cache_dir: Option<PathBuf>,
    #[arg(
        long = "force-redownload",
        help = "Ignore a cached archive and download it again"
    )]
    force_redownload: bool,
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["cache_dir", "force_redownload"],
        help = "Read from a local archive instead of downloading"
    )]
    archive: Option<PathBuf>,
}

/// Per-split tallies collected while streaming.
#[derive(Debug, Default)]
struct SplitSummary {
    examples: u64,
    labels: BTreeMap<&'static str, u64>,
}

impl SplitSummary {
    fn record(&mut self, label: Label) {
        self.examples += 1;
        *self.labels.entry(label.as_str()).or_default() += 1;
    }
}

#[derive(Serialize)]
struct ExportRow<'a> {
    id: ExampleId,
    #[serde(flatten)]
    example: &'a Example,
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn build_manager(cli: &AllocineDemoCli) -> Arc<dyn DownloadManager> {
    if let Some(archive) = &cli.archive {
        return Arc::new(LocalDownloadManager::new().with_fallback(archive));
    }
    let mut config = match &cli.cache_dir {
        Some(dir) => DownloadConfig::new(dir),
        None => DownloadConfig::from_env(),
    };
    config = config.with_force_redownload(cli.force_redownload);
    Arc::new(HttpDownloadManager::new(config))
}

fn print_example(split: Split, id: ExampleId, example: &Example) {
    const PREVIEW_CHARS: usize = 120;
    let mut preview: String = example.review.chars().take(PREVIEW_CHARS).collect();
    if example.review.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    println!("[{split}] #{id} {:>3} | {preview}", example.label.as_str());
}

fn run_split(
    generator: &SplitGenerator,
    limit: usize,
    read_all: bool,
    export_dir: Option<&Path>,
) -> Result<SplitSummary, Box<dyn Error>> {
    let split = generator.split();
    let mut writer = match export_dir {
        Some(dir) => {
            let path = dir.join(format!("{split}.jsonl"));
            info!("[allocine:demo] exporting {split} -> {}", path.display());
            Some(BufWriter::new(File::create(path)?))
        }
        None => None,
    };

    let mut open = generator.open()?;
    let mut summary = SplitSummary::default();
    for item in open.examples()? {
        let (id, example) = item?;
        if summary.examples < limit as u64 {
            print_example(split, id, &example);
        }
        summary.record(example.label);
        if let Some(writer) = writer.as_mut() {
            serde_json::to_writer(&mut *writer, &ExportRow { id, example: &example })?;
            writer.write_all(b"\n")?;
        }
        if !read_all && summary.examples >= limit as u64 {
            break;
        }
    }
    if let Some(mut writer) = writer {
        writer.flush()?;
    }
    Ok(summary)
}

/// Run the split preview/export demo.
///
/// `args_iter` excludes the program name.
pub fn run_allocine_demo<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<AllocineDemoCli, _>(std::iter::once("allocine_demo".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let registry = DatasetRegistry::with_builtin();
    let builder = registry.get(&cli.dataset)?;
    let info = builder.describe();
    println!(
        "=== {} v{} ===\n{}",
        info.config_name,
        info.version,
        info.description.trim()
    );

    if let Some(dir) = &cli.export_dir {
        fs::create_dir_all(dir)?;
        let path = info.write_to_dir(dir)?;
        info!("[allocine:demo] wrote {}", path.display());
    }

    let selected: Vec<Split> = if cli.splits.is_empty() {
        ALL_SPLITS.to_vec()
    } else {
        cli.splits.iter().copied().map(Split::from).collect()
    };
    let read_all = cli.count || cli.export_dir.is_some();

    let generators = builder.plan_splits(build_manager(&cli));
    for split in selected {
        let Some(generator) = generators.iter().find(|generator| generator.split() == split)
        else {
            warn!("[allocine:demo] dataset '{}' has no {split} split", cli.dataset);
            continue;
        };
        let summary = run_split(generator, cli.limit, read_all, cli.export_dir.as_deref())?;
        if !read_all {
            continue;
        }
        let balance = summary
            .labels
            .iter()
            .map(|(label, count)| format!("{label}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!("[{split}] examples={} {balance}", summary.examples);
        if summary.examples != split.expected_examples() {
            warn!(
                "[allocine:demo] {split} produced {} example(s), documented size is {}",
                summary.examples,
                split.expected_examples()
            );
        }
    }
    Ok(())
}
