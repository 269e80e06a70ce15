//! # CLI Module
//!
//! Command-line interface for the Immich duplicate cleaner.
//!
//! ## Usage
//! ```bash
//! # Synchronize albums only (dry run)
//! immich-dedup --url http://localhost:2283 --api-key YOUR_KEY --dry-run
//!
//! # Synchronize albums and delete lower-quality duplicates
//! immich-dedup -u http://localhost:2283 -k YOUR_KEY --auto-delete
//!
//! # JSON summary for scripting
//! IMMICH_URL=http://localhost:2283 IMMICH_API_KEY=KEY immich-dedup -d -y --output json
//! ```

mod prompt;

use clap::{Parser, ValueEnum};
use console::{style, Term};
use immich_duplicate_cleaner::core::gateway::short_id;
use immich_duplicate_cleaner::core::pipeline::{Pipeline, PipelineResult};
use immich_duplicate_cleaner::core::processor::{DeletionOutcome, GroupOutcome};
use immich_duplicate_cleaner::error::Result;
use immich_duplicate_cleaner::events::{Event, EventChannel, GroupEvent, RunEvent};
use immich_duplicate_cleaner::{init_tracing, CleanerConfig};
use indicatif::{ProgressBar, ProgressStyle};
use prompt::{ProgressWriter, TerminalConfirmer};
use std::thread;
use std::time::Duration;

/// Immich Duplicate Cleaner - sync albums across duplicates, keep the best copy
#[derive(Parser, Debug)]
#[command(name = "immich-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Immich server URL (e.g. http://localhost:2283)
    #[arg(short = 'u', long, env = "IMMICH_URL")]
    url: Option<String>,

    /// Immich API key
    #[arg(short = 'k', long, env = "IMMICH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Automatically delete lower-quality duplicates
    #[arg(short = 'd', long)]
    auto_delete: bool,

    /// Preview actions without making changes
    #[arg(long)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Timeout for each API request, in seconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Output format for the final summary
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = CleanerConfig::builder()
        .auto_delete(cli.auto_delete)
        .dry_run(cli.dry_run)
        .assume_yes(cli.yes)
        .verbose(cli.verbose)
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(url) = cli.url {
        builder = builder.server_url(url);
    }
    if let Some(key) = cli.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build()?;

    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    // Hidden for verbose and JSON runs
    let progress = if pretty && !config.verbose {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    init_tracing(config.verbose, ProgressWriter::new(progress.clone()));

    if pretty {
        progress.suspend(|| {
            term.write_line(&format!(
                "{} {}",
                style("Immich Duplicate Cleaner").bold().cyan(),
                style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim()
            ))
            .ok();
            if config.dry_run {
                term.write_line(&format!(
                    "{}",
                    style("DRY RUN - no changes will be made").yellow()
                ))
                .ok();
            }
            term.write_line("").ok();
        });
    }

    let pipeline = Pipeline::builder(config.clone())
        .confirmer(Box::new(TerminalConfirmer::new(progress.clone())))
        .build()?;

    let (sender, receiver) = EventChannel::new();
    let progress_clone = progress.clone();

    // Draw progress on a separate thread; groups are still processed in order
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Run(RunEvent::GroupsListed { total }) => {
                    progress_clone.set_length(total as u64);
                }
                Event::Group(GroupEvent::Started { group_id, .. }) => {
                    progress_clone.set_message(format!("group {}", short_id(&group_id)));
                }
                Event::Group(GroupEvent::Completed { .. }) => {
                    progress_clone.inc(1);
                }
                Event::Run(RunEvent::Completed { .. }) | Event::Run(RunEvent::Error { .. }) => {
                    progress_clone.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = result?;
    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, &config),
        OutputFormat::Json => print_json_results(&result, &config),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, config: &CleanerConfig) {
    let summary = &result.summary;

    term.write_line("").ok();
    term.write_line(&format!("{} Processing complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    if summary.total_groups == 0 {
        term.write_line(&format!(
            "  {} No duplicates found - nothing to do!",
            style("🎉").green()
        ))
        .ok();
        return;
    }

    term.write_line(&format!(
        "  {} duplicate groups in {:.1}s",
        style(summary.total_groups).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    let additions_label = if config.dry_run {
        "album additions planned"
    } else {
        "album additions"
    };
    term.write_line(&format!(
        "  {} {}",
        style(summary.album_additions).cyan(),
        additions_label
    ))
    .ok();

    if config.auto_delete {
        let deleted_label = if config.dry_run {
            "duplicates would be deleted"
        } else {
            "duplicates deleted"
        };
        term.write_line(&format!(
            "  {} {}",
            style(summary.assets_deleted).yellow(),
            deleted_label
        ))
        .ok();
    }

    if summary.skipped_groups > 0 {
        term.write_line(&format!(
            "  {} groups skipped (fewer than 2 assets)",
            style(summary.skipped_groups).dim()
        ))
        .ok();
    }
    if summary.cancelled_groups > 0 {
        term.write_line(&format!(
            "  {} groups left untouched at the prompt",
            style(summary.cancelled_groups).dim()
        ))
        .ok();
    }
    if summary.deletion_failures > 0 {
        term.write_line(&format!(
            "  {} deletions failed",
            style(summary.deletion_failures).red()
        ))
        .ok();
    }
    if summary.failed_groups > 0 {
        term.write_line(&format!(
            "  {} groups failed",
            style(summary.failed_groups).red().bold()
        ))
        .ok();
        for error in &result.errors {
            term.write_line(&format!("    {} {}", style("✗").red(), error))
                .ok();
        }
    }

    if config.verbose {
        term.write_line("").ok();
        for outcome in &result.outcomes {
            if let GroupOutcome::Processed(report) = outcome {
                let kept = match &report.deletion {
                    DeletionOutcome::NothingToDelete { kept }
                    | DeletionOutcome::Cancelled { kept, .. }
                    | DeletionOutcome::Completed { kept, .. } => {
                        format!(", kept {}", short_id(kept))
                    }
                    DeletionOutcome::Disabled | DeletionOutcome::InsufficientMetadata { .. } => {
                        String::new()
                    }
                };
                term.write_line(&format!(
                    "  {} {}: +{} album memberships{}",
                    style("★").green(),
                    short_id(&report.group_id),
                    report.sync.additions,
                    kept
                ))
                .ok();
            }
        }
    }

    term.write_line("").ok();
    if !config.auto_delete {
        term.write_line(&format!(
            "{}",
            style("Tip: use --auto-delete to remove lower-quality duplicates").dim()
        ))
        .ok();
    }
}

fn print_json_results(result: &PipelineResult, config: &CleanerConfig) {
    let output = serde_json::json!({
        "config": config,
        "summary": result.summary,
        "groups": result.outcomes,
        "errors": result.errors,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}
