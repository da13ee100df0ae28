use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::assembler::assemble_with_index;
use crate::config::PipelineConfig;
use crate::data::{ExampleSet, Task};
use crate::grouping::EntityIndex;
use crate::metrics::{WindowStats, category_skew};
use crate::source::{EventSource, ShardSource};
use crate::tasks::make_tasks_seeded;

#[derive(Debug, Parser)]
#[command(
    name = "build_examples",
    disable_help_subcommand = true,
    about = "Assemble windowed news examples from a table of articles and prices",
    long_about = "Load a JSON-lines or parquet news table, serialize each article with its prior-article window, and emit (text, label, sector) examples.",
    after_help = "Set RUST_LOG (for example RUST_LOG=debug) to control log verbosity."
)]
/// CLI for `build_examples`.
///
/// Common usage:
/// - Preview a few examples: `--input data/ --preview 2`
/// - Write all examples: `--input data/ --output examples.jsonl`
/// - Sample sector tasks: `--input data/ --tasks 3 --seed 7 --task-dir tasks/`
struct BuildExamplesCli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Shard file or directory of .jsonl/.ndjson/.parquet shards"
    )]
    input: PathBuf,
    #[arg(
        long = "window-size",
        help = "Maximum number of prior articles per example (default 10)"
    )]
    window_size: Option<usize>,
    #[arg(long = "max-rows", help = "Stop loading after this many rows")]
    max_rows: Option<usize>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Write all examples as JSON lines to this file"
    )]
    output: Option<PathBuf>,
    #[arg(
        long,
        value_parser = parse_positive_usize,
        help = "Sample this many sectors and build one task per sector"
    )]
    tasks: Option<usize>,
    #[arg(long, help = "Seed for task sampling")]
    seed: Option<u64>,
    #[arg(
        long = "task-dir",
        value_name = "DIR",
        requires = "tasks",
        help = "Write each sampled task as JSON lines into this directory"
    )]
    task_dir: Option<PathBuf>,
    #[arg(long, default_value_t = 0, help = "Print the first N serialized examples")]
    preview: usize,
}

/// Entry point for the `build_examples` binary.
pub fn run_build_examples<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let Some(cli) = parse_cli::<BuildExamplesCli, _>(
        std::iter::once("build_examples".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = PipelineConfig::default();
    config.window_size = cli.window_size.unwrap_or(config.window_size);
    config.num_tasks = cli.tasks.unwrap_or(config.num_tasks);
    config.seed = cli.seed.unwrap_or(config.seed);
    config.validate()?;

    let source_id = cli.input.display().to_string();
    let source = ShardSource::new(source_id, &cli.input)
        .with_max_rows(cli.max_rows)
        .with_columns(config.columns.clone());
    let table = source.load()?;

    let total = table.len();
    let report_every = (total / 20).max(1);
    let index = EntityIndex::build(&table.events);
    let mut stats = WindowStats::new(config.window_size);
    let examples = assemble_with_index(
        &table.events,
        &index,
        config.window_size,
        |done, total, window| {
            stats.record(window.len());
            if done % report_every == 0 || done == total {
                info!(done, total, "assembling examples");
            }
        },
    );

    println!(
        "examples={} entities={} window_size={} empty_windows={} full_windows={} mean_window={:.2}",
        examples.len(),
        index.len(),
        stats.window_size,
        stats.empty,
        stats.full,
        stats.mean_len
    );
    if let Some(skew) = category_skew(&examples) {
        println!(
            "categories={} min={} max={} max_share={:.3} ratio={:.2}",
            skew.categories, skew.min, skew.max, skew.max_share, skew.ratio
        );
    }

    for (idx, example) in examples.iter().take(cli.preview).enumerate() {
        println!("=== example {idx} label={:?} group={:?}", example.label, example.group_key);
        println!("{}", example.text);
    }

    if let Some(path) = &cli.output {
        write_examples_file(path, &examples)?;
        println!("wrote {} examples to {}", examples.len(), path.display());
    }

    if cli.tasks.is_some() {
        let tasks = make_tasks_seeded(&examples, config.num_tasks, config.seed)?;
        for (idx, task) in tasks.iter().enumerate() {
            println!("task {idx}: {} ({} examples)", task.name(), task.examples.len());
        }
        if let Some(dir) = &cli.task_dir {
            write_task_files(dir, &tasks)?;
        }
    }
    Ok(())
}

/// Write `examples` as one JSON object per line.
pub fn write_examples_jsonl<W: Write>(
    writer: &mut W,
    examples: &ExampleSet,
) -> Result<(), Box<dyn Error>> {
    for example in examples.iter() {
        serde_json::to_writer(&mut *writer, &example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_examples_file(path: &Path, examples: &ExampleSet) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_examples_jsonl(&mut writer, examples)
}

fn write_task_files(dir: &Path, tasks: &[Task]) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    for (idx, task) in tasks.iter().enumerate() {
        let name: String = task
            .name()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        let path = dir.join(format!("task_{idx}_{name}.jsonl"));
        write_examples_file(&path, &task.examples)?;
        info!(task = task.name(), path = %path.display(), "wrote task");
    }
    Ok(())
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!("Could not parse --tasks value '{raw}' as a positive integer")
    })?;
    if parsed == 0 {
        return Err("--tasks must be greater than zero".to_string());
    }
    Ok(parsed)
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
