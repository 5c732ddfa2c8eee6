//! mimic-notes CLI: stream MIMIC note tables as JSONL, count rows, print
//! schemas, and check a data directory.

use clap::{Args, Parser, Subcommand};
use mimic_notes_core::config::{require_data_dir, LoaderConfig};
use mimic_notes_core::dataset::{DatasetConfig, Split};
use mimic_notes_core::hash::StreamDigest;
use mimic_notes_core::manifest::EmitManifest;
use mimic_notes_core::record::{Note, NoteEvent, NoteRecord};
use mimic_notes_io::emit;
use mimic_notes_io::writers::JsonlWriter;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mimic-notes")]
#[command(about = "Stream gzip-compressed MIMIC clinical-note tables as records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Named configuration: noteevents, all, discharge or radiology
    #[arg(short, long)]
    config: Option<DatasetConfig>,

    /// Directory holding the .csv.gz files (overrides config file and env)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// YAML file with data_dir / config / buffer_capacity
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Read buffer size in bytes
    #[arg(long)]
    buffer_capacity: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream every record as one JSON object per line
    Emit {
        #[command(flatten)]
        source: SourceArgs,

        /// Write JSONL here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<u64>,

        /// Write the run manifest (JSON) here
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Count data rows per file
    Count {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the declared schema of a configuration
    Schema {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Check that the data directory holds every file the configuration reads
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Emit {
            source,
            output,
            limit,
            manifest,
        } => resolve_config(&source)
            .and_then(|cfg| run_emit(&cfg, output, limit, manifest)),
        Commands::Count { source } => resolve_config(&source).and_then(|cfg| run_count(&cfg)),
        Commands::Schema { source } => resolve_config(&source).and_then(|cfg| print_schema(&cfg)),
        Commands::Validate { source } => {
            resolve_config(&source).and_then(|cfg| validate_data_dir(&cfg))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// env < YAML file < flags.
fn resolve_config(args: &SourceArgs) -> Result<LoaderConfig, Box<dyn std::error::Error>> {
    let mut cfg = LoaderConfig::from_env();
    if let Some(path) = &args.config_file {
        let yaml = fs::read_to_string(path)?;
        cfg.apply_doc(&LoaderConfig::doc_from_yaml_str(&yaml)?);
    }
    apply_flags(&mut cfg, args);
    Ok(cfg)
}

fn apply_flags(cfg: &mut LoaderConfig, args: &SourceArgs) {
    if let Some(c) = args.config {
        cfg.dataset_config = c;
    }
    if let Some(dir) = &args.data_dir {
        cfg.data_dir = Some(dir.clone());
    }
    if let Some(cap) = args.buffer_capacity {
        cfg.buffer_capacity = cap.max(1);
    }
}

fn run_emit(
    cfg: &LoaderConfig,
    output: Option<PathBuf>,
    limit: Option<u64>,
    manifest_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = now_ms();
    let mut stream = emit(cfg)?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = JsonlWriter::to_writer(sink);
    let mut digest = StreamDigest::new();

    let limit = limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
    for item in stream.by_ref().take(limit) {
        let (id, record) = item?;
        writer.write_record(id, &record)?;
        digest.update(id, &record)?;
    }
    writer.finish()?.flush()?;

    let manifest = EmitManifest::new(cfg.dataset_config, started).finish(
        now_ms(),
        stream.file_summaries().to_vec(),
        Some(digest.finalize()),
    );
    tracing::info!(
        config = %manifest.config,
        rows = manifest.total_rows,
        elapsed_ms = manifest.finished_ms - manifest.started_ms,
        digest = %digest.finalize(),
        "emission finished"
    );
    if let Some(path) = manifest_path {
        fs::write(path, serde_json::to_vec_pretty(&manifest)?)?;
    }
    Ok(())
}

fn run_count(cfg: &LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = emit(cfg)?;
    for item in stream.by_ref() {
        item?;
    }
    let mut total = 0;
    for summary in stream.file_summaries() {
        println!("{}\t{}", summary.file, summary.rows);
        total += summary.rows;
    }
    println!("total\t{}", total);
    Ok(())
}

fn print_schema(cfg: &LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = cfg.dataset_config;
    let schema = match config {
        DatasetConfig::NoteEvents => NoteEvent::schema(),
        _ => Note::schema(),
    };
    let doc = serde_json::json!({
        "dataset": config.dataset().name(),
        "config": config.name(),
        "description": config.description(),
        "splits": Split::all().iter().map(|s| s.name()).collect::<Vec<_>>(),
        "files": config.source_files(),
        "schema": schema,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn validate_data_dir(cfg: &LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dir = require_data_dir(cfg.data_dir.as_deref())?;
    let missing: Vec<&str> = cfg
        .dataset_config
        .source_files()
        .iter()
        .copied()
        .filter(|f| !dir.join(f).is_file())
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing in {}: {}", dir.display(), missing.join(", ")).into());
    }
    println!(
        "✓ {} has every file for '{}'",
        dir.display(),
        cfg.dataset_config
    );
    Ok(())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{apply_flags, LoaderConfig, SourceArgs};
    use mimic_notes_core::dataset::DatasetConfig;
    use std::path::PathBuf;

    #[test]
    fn flags_override_config_file() {
        let mut config = LoaderConfig::from_yaml_str(
            "data_dir: /data/from-yaml\nconfig: radiology\nbuffer_capacity: 1024\n",
        )
        .unwrap();
        let args = SourceArgs {
            config: Some(DatasetConfig::Discharge),
            data_dir: Some(PathBuf::from("/data/from-flag")),
            ..Default::default()
        };
        apply_flags(&mut config, &args);
        assert_eq!(config.dataset_config, DatasetConfig::Discharge);
        assert_eq!(config.data_dir, Some(PathBuf::from("/data/from-flag")));
        assert_eq!(config.buffer_capacity, 1024);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = LoaderConfig::new("/data/mimic-iii", DatasetConfig::NoteEvents);
        apply_flags(&mut config, &SourceArgs::default());
        assert_eq!(config.dataset_config, DatasetConfig::NoteEvents);
        assert_eq!(config.data_dir, Some(PathBuf::from("/data/mimic-iii")));
    }
}
