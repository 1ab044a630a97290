use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use vidsheet::{
    BatchObserver, BatchReport, FfmpegFrameExtractor, FfmpegProber, SheetConfig, SheetError,
    SheetFont, SheetOutcome, generate_sheet, is_supported_video, run_batch,
};

const CLI_AFTER_HELP: &str = "Examples:\n  vidsheet movie.mp4\n  vidsheet /media/videos --workers 8 --progress\n  vidsheet clip.mkv --columns 4 --rows 3 --width 1280\n  vidsheet /media/videos --json > report.json";

#[derive(Debug, Parser)]
#[command(
    name = "vidsheet",
    version,
    about = "Generate contact-sheet summary images from video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// A video file, or a directory whose videos are processed (non-recursive).
    path: PathBuf,

    /// Number of thumbnail columns on the sheet.
    #[arg(long, default_value_t = 5)]
    columns: u32,

    /// Number of thumbnail rows on the sheet.
    #[arg(long, default_value_t = 5)]
    rows: u32,

    /// Total sheet width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Number of videos processed concurrently in directory mode.
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Font file for header and timecode text (defaults to a system font).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Show a progress bar instead of per-file lines in directory mode.
    #[arg(long)]
    progress: bool,

    /// Print the batch report as machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,
}

/// Prints one colored outcome line per processed file.
struct LineObserver;

impl BatchObserver for LineObserver {
    fn on_item(
        &self,
        index: usize,
        total: usize,
        path: &Path,
        result: &Result<SheetOutcome, SheetError>,
    ) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let prefix = format!("[{}/{}]", index + 1, total);

        match result {
            Ok(SheetOutcome::Generated(_)) => {
                println!("{} {} {name}", prefix.dimmed(), "saved sheet for".green());
            }
            Ok(SheetOutcome::Skipped(_)) => {
                println!(
                    "{} {} {name}",
                    prefix.dimmed(),
                    "sheet already exists, skipping".yellow()
                );
            }
            Err(error) => {
                eprintln!("{} {} {name}: {error}", prefix.dimmed(), "failed".red().bold());
            }
        }
    }
}

/// Drives an indicatif bar, surfacing failures above it.
struct BarObserver {
    bar: ProgressBar,
}

impl BatchObserver for BarObserver {
    fn on_item(
        &self,
        _index: usize,
        total: usize,
        path: &Path,
        result: &Result<SheetOutcome, SheetError>,
    ) {
        // Discovery happens inside run_batch, so the total is only known
        // once items start completing.
        self.bar.set_length(total as u64);
        if let Err(error) = result {
            self.bar
                .println(format!("{} {}: {error}", "failed".red().bold(), path.display()));
        }
        self.bar.inc(1);
    }
}

fn print_report(report: &BatchReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let payload = json!({
            "total": report.total,
            "successful": report.successful,
            "failed": report.failed,
            "elapsed_seconds": report.elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let seconds = report.elapsed.as_secs_f64();
    println!();
    println!("{}", "Folder processing complete!".bold());
    println!("Total videos: {}", report.total);
    println!("Successful: {}", report.successful.to_string().green());
    if report.failed > 0 {
        println!("Failed: {}", report.failed.to_string().red());
    } else {
        println!("Failed: {}", report.failed);
    }
    println!(
        "Time taken: {seconds:.2} seconds ({:.2} minutes)",
        seconds / 60.0
    );
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if !cli.path.exists() {
        return Err(format!("path not found: {}", cli.path.display()).into());
    }

    let mut config = SheetConfig::new()
        .with_grid(cli.columns, cli.rows)
        .with_sheet_width(cli.width)
        .with_workers(cli.workers);
    if let Some(font_path) = cli.font.clone() {
        config = config.with_font_path(font_path);
    }

    let font = SheetFont::load(config.font_path.as_deref())?;
    let prober = FfmpegProber::new();
    let extractor = FfmpegFrameExtractor::new();

    if cli.path.is_dir() {
        println!("Scanning folder: {}", cli.path.display());

        let report = if cli.progress {
            let bar = ProgressBar::new(0);
            let style =
                ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
            bar.set_style(style.progress_chars("##-"));
            let observer = BarObserver { bar };
            let report = run_batch(&cli.path, &prober, &extractor, &font, &config, &observer)?;
            observer.bar.finish_and_clear();
            report
        } else {
            run_batch(&cli.path, &prober, &extractor, &font, &config, &LineObserver)?
        };

        print_report(&report, cli.json)?;
        return Ok(());
    }

    if !is_supported_video(&cli.path) {
        return Err(format!("not a supported video file: {}", cli.path.display()).into());
    }

    match generate_sheet(&cli.path, &prober, &extractor, &font, &config)? {
        SheetOutcome::Generated(sheet_path) => {
            println!("{} {}", "saved".green().bold(), sheet_path.display());
        }
        SheetOutcome::Skipped(sheet_path) => {
            println!(
                "{} sheet already exists at {}",
                "skipped".yellow().bold(),
                sheet_path.display()
            );
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
