//! kbcm - knowledge base component manager
//!
//! Installs reusable knowledge base components: resolves their dependencies
//! in a knowledge base snapshot, clones their source repositories and imports
//! their declarative files, dependencies first.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod error;
mod fetcher;
mod git;
mod importer;
mod operations;
mod path_utils;
mod progress;
mod registry;
mod resolver;
mod validator;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

/// Log to stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.config, args),
    };

    if let Err(e) = result {
        eprintln!("{}", render_error(&e));
        std::process::exit(1);
    }
}

/// Error message followed by the diagnostic help, when the error has one
fn render_error(error: &error::KbcmError) -> String {
    match error.help() {
        Some(help) => format!("Error: {error}\n  help: {help}"),
        None => format!("Error: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::KbcmError;

    #[test]
    fn test_render_error_appends_help() {
        let rendered = render_error(&KbcmError::ComponentNotFound {
            name: "LibY".to_string(),
        });
        assert_eq!(
            rendered,
            "Error: Component 'LibY' not found\n  \
             help: Check that the component identifier is declared in the knowledge base"
        );
    }

    #[test]
    fn test_render_error_without_help() {
        let rendered = render_error(&KbcmError::ConfigNotFound {
            path: "kbcm.yaml".to_string(),
        });
        assert!(rendered.starts_with("Error: "));
        assert!(!rendered.contains("help:"));
    }
}
