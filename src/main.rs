use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use opendd_catalog::DatasetCatalog;

#[derive(Parser)]
#[command(name = "opendd-catalog")]
#[command(about = "List the valid sessions and georeferenced places of an openDD dataset", long_about = None)]
#[command(version)]
struct Cli {
    /// Dataset root containing rdb1to6.sqlite and image_georeferenced/
    #[arg(required_unless_present = "dataset_dir_flag")]
    dataset_dir: Option<PathBuf>,

    /// Same as the positional argument, which wins when both are given
    #[arg(long = "dataset-dir", id = "dataset_dir_flag", env = "OPENDD_DATASET_DIR")]
    dataset_dir_flag: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "plain")]
    format: OutputFormat,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.as_filter())
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        log::error!("Failed to load dataset: {e:#}");
        std::process::exit(1);
    }
}

impl Cli {
    fn dataset_dir(&self) -> Option<&Path> {
        self.dataset_dir
            .as_deref()
            .or(self.dataset_dir_flag.as_deref())
    }
}

fn run(cli: &Cli) -> Result<()> {
    let dataset_dir = cli.dataset_dir().context("no dataset directory given")?;
    let catalog = DatasetCatalog::build(dataset_dir)
        .with_context(|| format!("loading catalog from {}", dataset_dir.display()))?;

    match cli.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&catalog).context("serializing catalog")?;
            println!("{json}");
        }
        OutputFormat::Plain => print_plain(&catalog),
    }
    Ok(())
}

fn print_plain(catalog: &DatasetCatalog) {
    println!("dataset: {}", catalog.dataset_dir());
    println!("store:   {}", catalog.db_path());

    println!("\nsessions ({}):", catalog.session_count());
    for id in catalog.session_ids() {
        println!("  {id}");
    }

    println!("\nplaces ({}):", catalog.place_count());
    for place in catalog.places().values() {
        let params: Vec<String> = place.world_params.iter().map(|v| v.to_string()).collect();
        println!(
            "  {:<12} {:>11}  [{}]  {}",
            place.name,
            place.image_size.to_string(),
            params.join(", "),
            place.image_path
        );
    }
}
