//! CLI definitions using clap derive API
//!
//! Each command's argument types live in their own submodule:
//! - install: Install command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod install;

pub use install::InstallArgs;

/// kbcm - knowledge base component manager
///
/// Installs reusable knowledge base components together with their dependencies.
#[derive(Parser, Debug)]
#[command(
    name = "kbcm",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Knowledge base component manager",
    long_about = "kbcm installs reusable knowledge base components: it resolves their \
                  dependencies, clones their source repositories and imports their \
                  declarative files, dependencies first.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  kbcm install part_ui                 \x1b[90m# Install one component\x1b[0m\n   \
                  kbcm install part_ui part_web -j 2   \x1b[90m# Install two components in parallel\x1b[0m\n   \
                  kbcm -c ./kbcm.yaml install part_ui  \x1b[90m# Use a specific configuration\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to ./kbcm.yaml when present)
    #[arg(long, short = 'c', global = true, env = "KBCM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install components and their dependencies
    Install(InstallArgs),
}
