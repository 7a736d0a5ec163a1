use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use blocktable_core::config::LOCAL_CONFIG;
use blocktable_core::edit::LabelFix;
use blocktable_core::pipeline::{self, SortSettings, SyncSettings};
use blocktable_core::{
    audit, BlockEntry, BlockTableError, Category, JsonSnapshotStore, MaintenanceConfig, Result,
    Snapshot,
};

#[derive(Debug, Parser)]
#[command(name = "blocktable", version, about = "Sort, sync and audit the Minecraft block tables")]
struct Cli {
    /// Config file. Defaults to ./blocktable.json, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source document, overriding the config.
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Snapshot file, overriding the config.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long, global = true)]
    dry_run: bool,

    /// -v for info logs, -vv for debug.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sort every category, rewrite the source and save the snapshot.
    Sort {
        /// Building entries to echo after sorting.
        #[arg(long)]
        sample: Option<usize>,
        /// Remove malformed records instead of keeping them after the sorted entries.
        #[arg(long)]
        drop_malformed: bool,
    },
    /// Apply the snapshot to other documents.
    Sync {
        /// Documents to update. Defaults to the configured targets.
        targets: Vec<PathBuf>,
        /// Update every .js file under this directory that declares a category.
        #[arg(long, conflicts_with = "targets")]
        dir: Option<PathBuf>,
    },
    /// Flat listing of every entry with per-category totals.
    Extract {
        #[arg(long)]
        output: Option<PathBuf>,
        /// Read the source document instead of the snapshot.
        #[arg(long)]
        from_source: bool,
    },
    /// Repeated identifiers and labels.
    Duplicates {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        from_source: bool,
    },
    /// Category shares, misplaced entries, shape grouping and variation families.
    Audit {
        #[arg(long)]
        from_source: bool,
    },
    /// Expected identifiers that no category lists.
    Coverage {
        /// JSON array of identifiers.
        #[arg(long)]
        expected: Option<PathBuf>,
        /// Expect `{wood}{suffix}` for every wood species.
        #[arg(long = "wood-suffix")]
        wood_suffixes: Vec<String>,
        #[arg(long)]
        from_source: bool,
    },
    /// Apply a JSON list of label corrections to the snapshot.
    Fix { fixes: PathBuf },
    /// Merge a JSON list of entries into one category of the snapshot.
    Add {
        category: Category,
        entries: PathBuf,
        /// Drop existing entries whose identifier contains this first.
        #[arg(long)]
        replace_matching: Option<String>,
    },
    /// Keep each identifier only in its highest-priority category.
    Dedupe {
        #[arg(long, value_delimiter = ',')]
        priority: Vec<Category>,
    },
    /// Show the classification key of identifiers.
    Classify {
        #[arg(required = true)]
        identifiers: Vec<String>,
        #[arg(long)]
        category: Option<Category>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(mut base) = dirs::config_dir() {
        base.push("blocktable");
        base.push("config.json");
        candidates.push(base);
    }
    candidates
}

fn load_config(cli: &Cli) -> Result<MaintenanceConfig> {
    let mut config = MaintenanceConfig::resolve(cli.config.as_deref(), &config_candidates())?;
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot = snapshot.clone();
    }
    debug!(?config, "resolved config");
    Ok(config)
}

fn input_snapshot(config: &MaintenanceConfig, from_source: bool) -> Result<Snapshot> {
    if from_source {
        pipeline::snapshot_from_source(&config.source, &config.required_categories)
    } else {
        pipeline::load_snapshot(&JsonSnapshotStore::new(&config.snapshot))
    }
}

/// Report files are skipped on dry runs.
fn report_path(output: Option<&Path>, dry_run: bool) -> Option<&Path> {
    if dry_run {
        None
    } else {
        output
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = load_config(&cli)?;
    let dry_run = cli.dry_run;
    let mut store = JsonSnapshotStore::new(&config.snapshot);

    match cli.command {
        Command::Sort {
            sample,
            drop_malformed,
        } => {
            let settings = SortSettings {
                source: config.source.clone(),
                required: config.required_categories.clone(),
                sample_size: sample.unwrap_or(config.sample_size),
                drop_malformed,
                dry_run,
            };
            pipeline::run_sort(&settings, &mut store)
        }
        Command::Sync { targets, dir } => {
            let settings = SyncSettings {
                targets: if targets.is_empty() { config.sync_targets.clone() } else { targets },
                discover: dir,
                required: config.required_categories.clone(),
                dry_run,
            };
            pipeline::run_sync(&settings, &store)
        }
        Command::Extract { output, from_source } => {
            let snapshot = input_snapshot(&config, from_source)?;
            pipeline::extract_report(&snapshot, report_path(output.as_deref(), dry_run))
        }
        Command::Duplicates { output, from_source } => {
            let snapshot = input_snapshot(&config, from_source)?;
            pipeline::duplicates_report(&snapshot, report_path(output.as_deref(), dry_run))
        }
        Command::Audit { from_source } => {
            let snapshot = input_snapshot(&config, from_source)?;
            Ok(pipeline::audit_report(&snapshot))
        }
        Command::Coverage {
            expected,
            wood_suffixes,
            from_source,
        } => {
            let snapshot = input_snapshot(&config, from_source)?;
            let mut wanted: Vec<String> = match &expected {
                Some(path) => pipeline::read_json(path)?,
                None => Vec::new(),
            };
            let suffixes = if expected.is_none() && wood_suffixes.is_empty() {
                vec!["_sign".to_string()]
            } else {
                wood_suffixes
            };
            for suffix in &suffixes {
                wanted.extend(audit::wood_family(suffix));
            }
            Ok(pipeline::coverage_report(&snapshot, &wanted))
        }
        Command::Fix { fixes } => {
            let fixes: Vec<LabelFix> = pipeline::read_json(&fixes)?;
            pipeline::run_fix(&mut store, &fixes, dry_run)
        }
        Command::Add {
            category,
            entries,
            replace_matching,
        } => {
            let additions: Vec<BlockEntry> = pipeline::read_json(&entries)?;
            pipeline::run_add(
                &mut store,
                category,
                &additions,
                replace_matching.as_deref(),
                dry_run,
            )
        }
        Command::Dedupe { priority } => {
            let priority = if priority.is_empty() {
                config.dedupe_priority.clone()
            } else {
                priority
            };
            if priority.is_empty() {
                return Err(BlockTableError::Config("dedupe priority is empty".to_string()));
            }
            pipeline::run_dedupe(&mut store, &priority, dry_run)
        }
        Command::Classify {
            identifiers,
            category,
        } => Ok(pipeline::classify_report(&identifiers, category)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(report) => print!("{report}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
