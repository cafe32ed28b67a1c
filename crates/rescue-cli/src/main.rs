//! CSV rescue CLI
//!
//! Moves rescued CSV files back into the data directory and replaces the
//! sentinel token with a missing value. Run without arguments to process
//! `./dataerror` and `./data` with the built-in settings.

use clap::{Parser, Subcommand};
use rescue_core::{
    list_csv_files, transform_file, BatchConfig, BatchDriver, BatchReport, ReplacementRule,
    TextEncoding, DEFAULT_SENTINEL,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rescue")]
#[command(about = "Rescue CSV files and replace sentinel values", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch (the default when no command is given)
    Run {
        /// Batch configuration file (JSON); defaults to the built-in targets
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Base directory for the built-in targets
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List the CSV files in a directory
    Scan {
        /// Directory to scan
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Replace the sentinel in a single file
    Transform {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Output path; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cell text to replace
        #[arg(long, default_value = DEFAULT_SENTINEL)]
        match_value: String,

        /// Replacement text; omit to write a missing value
        #[arg(long)]
        replacement: Option<String>,

        /// Text encoding of the file
        #[arg(long, default_value = "UTF-8")]
        encoding: TextEncoding,
    },

    /// Write the built-in batch configuration to a file
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,

        /// Base directory for the generated targets
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,
    },
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> rescue_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => cmd_run(None, Path::new("."), false),
        Some(Commands::Run {
            config,
            base_dir,
            json,
        }) => cmd_run(config.as_deref(), &base_dir, json),
        Some(Commands::Scan { dir }) => cmd_scan(&dir),
        Some(Commands::Transform {
            file,
            output,
            match_value,
            replacement,
            encoding,
        }) => cmd_transform(&file, output.as_deref(), match_value, replacement, encoding),
        Some(Commands::InitConfig { output, base_dir }) => cmd_init_config(&output, &base_dir),
    }
}

fn cmd_run(config_path: Option<&Path>, base_dir: &Path, json: bool) -> rescue_core::Result<()> {
    let config = match config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            BatchConfig::load(path)?
        }
        None => BatchConfig::default_for(base_dir),
    };
    let config = config.resolve(&chrono::Local::now().date_naive());

    let report = BatchDriver::new(config).run();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    for target in &report.targets {
        println!("{} ({}):", target.label, target.name);
        if target.source_listed > 0 || target.moved > 0 {
            println!("  moved {}/{} files", target.moved, target.source_listed);
        }
        println!(
            "  transformed {}/{} files, {} cells replaced",
            target.transformed, target.listed, target.replacements
        );
        for failure in &target.failures {
            println!(
                "  [failed] {} ({}): {}",
                failure.path.display(),
                failure.stage,
                failure.error
            );
        }
    }

    println!();
    println!(
        "Done: {} moved, {} transformed, {} failed",
        report.total_moved(),
        report.total_transformed(),
        report.total_failed()
    );
}

fn cmd_scan(dir: &Path) -> rescue_core::Result<()> {
    let files = list_csv_files(dir)?;

    println!("Found {} CSV file(s) in {}", files.len(), dir.display());
    for file in &files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn cmd_transform(
    file: &Path,
    output: Option<&Path>,
    match_value: String,
    replacement: Option<String>,
    encoding: TextEncoding,
) -> rescue_core::Result<()> {
    let rule = ReplacementRule::new(match_value, replacement);
    let output = output.unwrap_or(file);

    let outcome = transform_file(file, &rule, output, encoding)?;

    println!("File: {}", outcome.source.display());
    println!("Columns: {}", outcome.columns);
    println!("Rows: {}", outcome.rows);
    println!("Replaced: {}", outcome.replacements);
    println!("Written to: {}", outcome.output.display());

    Ok(())
}

fn cmd_init_config(output: &Path, base_dir: &Path) -> rescue_core::Result<()> {
    let config = BatchConfig::default_for(base_dir);
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!("Targets: {}", config.targets.len());
    println!();
    println!("Edit the file to configure your targets, then run:");
    println!("  rescue run --config {}", output.display());

    Ok(())
}
