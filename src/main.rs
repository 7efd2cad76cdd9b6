use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use dieta_parser::{input, parse_with, Document, ParseOptions, PlanReport, Profile, Settings};

#[derive(Parser)]
#[command(name = "dieta_parser", about = "Structure free-text diet plans into days, meals and totals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse plans and print JSON reports (`-` reads stdin)
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Indented JSON
        #[arg(long)]
        pretty: bool,
        /// Add item-count estimates to days without extracted totals
        #[arg(long)]
        estimate: bool,
        /// Profile JSON to embed in every report
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// One-line overview per plan
    Summary {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_str().into()),
        )
        .init();
    info!(settings_loaded = ?settings, "starting");

    let t0 = Instant::now();
    let cli = Cli::parse();
    let options = settings.parse_options();

    match cli.command {
        Commands::Parse {
            files,
            pretty,
            estimate,
            profile,
        } => {
            let profile = profile
                .as_deref()
                .map(input::load_profile)
                .transpose()
                .context("loading profile")?;
            let with_estimates = estimate || settings.estimate_missing_macros;
            let reports = build_reports(&files, &options, profile.as_ref(), with_estimates)?;

            let json = match (reports.as_slice(), pretty) {
                ([single], true) => serde_json::to_string_pretty(single)?,
                ([single], false) => serde_json::to_string(single)?,
                (_, true) => serde_json::to_string_pretty(&reports)?,
                (_, false) => serde_json::to_string(&reports)?,
            };
            println!("{}", json);
        }
        Commands::Summary { files } => {
            let rows = summarize(&files, &options)?;
            println!(
                "{:<32} | {:<10} | {:>4} | {:>5} | {:>4} | {:>6}",
                "File", "Strategy", "Days", "Meals", "Tips", "Kcal"
            );
            println!("{}", "-".repeat(76));
            for (path, doc) in &rows {
                let strategy = doc.strategy.map_or("-", |s| s.name());
                let kcal = doc
                    .days
                    .first()
                    .and_then(|d| d.macros)
                    .map_or_else(|| "-".to_string(), |m| m.calories.to_string());
                println!(
                    "{:<32} | {:<10} | {:>4} | {:>5} | {:>4} | {:>6}",
                    truncate(&path.display().to_string(), 32),
                    strategy,
                    doc.days.len(),
                    doc.meal_count(),
                    doc.tip_count(),
                    kcal
                );
            }
            let empty = rows.iter().filter(|(_, d)| d.is_empty()).count();
            println!("\n{} plans, {} without recognizable days", rows.len(), empty);
        }
    }

    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "done");
    Ok(())
}

fn build_reports(
    files: &[PathBuf],
    options: &ParseOptions,
    profile: Option<&Profile>,
    with_estimates: bool,
) -> anyhow::Result<Vec<PlanReport>> {
    files
        .par_iter()
        .map(|path| {
            parse_file(path, options).map(|doc| PlanReport::build(profile.cloned(), doc, with_estimates))
        })
        .collect()
}

fn summarize(files: &[PathBuf], options: &ParseOptions) -> anyhow::Result<Vec<(PathBuf, Document)>> {
    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let rows = files
        .par_iter()
        .map(|path| {
            let doc = parse_file(path, options);
            pb.inc(1);
            doc.map(|d| (path.clone(), d))
        })
        .collect::<anyhow::Result<Vec<_>>>();

    pb.finish_and_clear();
    rows
}

fn parse_file(path: &Path, options: &ParseOptions) -> anyhow::Result<Document> {
    let text = input::read_plan(path)?;
    let doc = parse_with(&text, options);
    if doc.is_empty() {
        warn!(path = %path.display(), "no days recovered");
    }
    Ok(doc)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
