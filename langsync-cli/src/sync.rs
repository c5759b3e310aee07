use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use langsync::{SyncEvent, SyncSession, discover_targets_with};

use crate::validation::{load_config, validate_source_file};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub source: String,
    pub targets: Vec<String>,
    pub config: Option<String>,
    pub dry_run: bool,
}

fn spinner() -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {wide_msg}") {
        progress_bar.set_style(style);
    }
    progress_bar
}

/// Run the sync command: propagate the source layout to every target.
pub fn run_sync_command(opts: SyncOptions) -> Result<(), String> {
    validate_source_file(&opts.source)?;
    let config = load_config(opts.config.as_deref())?;

    let targets: Vec<PathBuf> = if opts.targets.is_empty() {
        discover_targets_with(&opts.source, &config).map_err(|e| e.to_string())?
    } else {
        opts.targets.iter().map(PathBuf::from).collect()
    };
    if targets.is_empty() {
        return Err(format!("No locale files found next to {}", opts.source));
    }

    let session =
        SyncSession::new(&opts.source, targets, config).map_err(|e| e.to_string())?;

    if opts.dry_run {
        println!("Would sync {} into:", opts.source);
        for target in session.targets() {
            println!("  {}", target.display());
        }
        println!("Dry-run mode: no files were written");
        return Ok(());
    }

    let progress_bar = spinner();
    let (handle, events) = session.spawn();

    let mut terminal = None;
    for event in events {
        tracing::debug!("{}", event);
        if event.is_terminal() {
            terminal = Some(event);
        } else {
            progress_bar.set_message(event.message().to_string());
        }
    }

    let result = handle
        .join()
        .map_err(|_| "Sync worker panicked".to_string())?;

    match (result, terminal) {
        (Ok(report), Some(SyncEvent::Success(msg))) => {
            progress_bar.finish_with_message(format!("✅ {}", msg));
            for target in &report.targets {
                println!(
                    "  {} (kept {}, added {})",
                    target.path.display(),
                    target.stats.preserved,
                    target.stats.added
                );
            }
            Ok(())
        }
        (Err(e), Some(SyncEvent::Errored(msg))) => {
            progress_bar.finish_with_message("❌ Sync failed");
            tracing::debug!("session error: {:?}", e);
            Err(msg)
        }
        (Err(e), _) => {
            progress_bar.finish_with_message("❌ Sync failed");
            Err(e.to_string())
        }
        (Ok(_), _) => {
            progress_bar.finish_with_message("❌ Sync ended without a result");
            Err("Sync ended without a result".to_string())
        }
    }
}

/// Run the targets command: list the locale files a sync would update.
pub fn run_targets_command(source: &str, config: Option<&str>) -> Result<(), String> {
    validate_source_file(source)?;
    let config = load_config(config)?;
    let targets = discover_targets_with(source, &config).map_err(|e| e.to_string())?;

    if targets.is_empty() {
        println!("No locale files found next to {}", source);
    }
    for target in targets {
        println!("{}", target.display());
    }
    Ok(())
}

/// Run the check command: report whether a source file can be synchronized.
pub fn run_check_command(source: &str) -> Result<(), String> {
    validate_source_file(source)?;
    println!("✅ {}: valid resource file", source);
    Ok(())
}
