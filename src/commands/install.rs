//! Install command implementation
//!
//! The installation process:
//! 1. Load configuration and the knowledge base snapshot
//! 2. Wire the git fetcher and the kb source store
//! 3. Install every requested component, dependencies first
//! 4. Print a summary (or JSON) and fail when any request failed

use std::path::{Path, PathBuf};

use console::Style;
use tracing::debug;

use crate::cli::InstallArgs;
use crate::config::ManagerConfig;
use crate::error::{KbcmError, Result};
use crate::fetcher::{ArtifactFetcher, GitCloner};
use crate::importer::{Importer, KbSourceStore};
use crate::operations::{InstallOperation, InstallOptions, InstallReport};
use crate::progress::ProgressDisplay;
use crate::registry::YamlRegistry;

/// Run install command
pub fn run(config_path: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let mut config = ManagerConfig::load(config_path.as_deref())?;
    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            return Err(KbcmError::ConfigInvalid {
                message: "--jobs must be at least 1".to_string(),
            });
        }
        config.jobs = jobs;
    }
    debug!(?config, "Loaded configuration");

    let registry = open_registry(&config.knowledge_base, &args.names)?;
    let fetcher = ArtifactFetcher::new(
        &config.specifications_dir,
        config.fetch_hosts.clone(),
        Box::new(GitCloner::new(config.shallow_clone)),
    );
    let importer = Importer::new(
        &config.declarative_pattern,
        Box::new(KbSourceStore::new(&config.kb_sources_dir)),
    )?;
    let operation = InstallOperation::new(
        &registry,
        &fetcher,
        &importer,
        InstallOptions { jobs: config.jobs },
    );

    let progress = (!args.json && args.names.len() > 1)
        .then(|| ProgressDisplay::new(args.names.len() as u64));
    let report = match &progress {
        Some(progress) => {
            let report = operation.install_with_progress(&args.names, Some(progress));
            progress.finish(report.is_success());
            report
        }
        None => operation.install(&args.names),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, fetcher.root());
    }

    match report.to_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Nothing is read from the knowledge base when no component was requested
fn open_registry(path: &Path, names: &[String]) -> Result<YamlRegistry> {
    if names.is_empty() {
        return Ok(YamlRegistry::default());
    }
    let registry = YamlRegistry::open(path)?;
    debug!(path = %path.display(), entities = registry.len(), "Loaded knowledge base");
    Ok(registry)
}

fn print_summary(report: &InstallReport, specifications_dir: &Path) {
    if report.requests.is_empty() {
        println!("Nothing to install.");
        return;
    }

    let installed = report.installed();
    if !installed.is_empty() {
        println!(
            "Installed {} component(s) into {}:",
            installed.len(),
            specifications_dir.display()
        );
        for name in &installed {
            println!("  {}", Style::new().bold().green().apply_to(name));
        }
    }

    for failure in report.failures() {
        println!(
            "  {} {}",
            Style::new().bold().red().apply_to(failure.root()),
            Style::new().dim().apply_to(format!(
                "({} failed at {}: {})",
                failure.component, failure.stage, failure.error
            ))
        );
    }
}
