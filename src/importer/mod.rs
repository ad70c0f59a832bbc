//! Importing declarative files into the target store
//!
//! The file format is owned by the store. The importer only picks which
//! files to hand over: regular files at the top level of an artifact
//! directory whose name matches the declarative-file pattern, in file-name
//! order. Import stops at the first file the store rejects.

mod store;

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{KbcmError, Result};
use crate::fetcher::SOURCE_MARKER_FILE;

pub use store::KbSourceStore;

/// Default pattern for declarative files
pub const DEFAULT_DECLARATIVE_PATTERN: &str = "*.scs";

/// Boundary to the store that understands declarative files
pub trait TargetStore: Send + Sync {
    /// Load one declarative file, or return `KbcmError::ImportFailed`
    fn load_declarative_file(&self, path: &Path) -> Result<()>;
}

/// Loads every declarative file of a directory into a [`TargetStore`]
pub struct Importer {
    pattern: Glob<'static>,
    store: Box<dyn TargetStore>,
}

impl Importer {
    pub fn new(pattern: &str, store: Box<dyn TargetStore>) -> Result<Self> {
        let pattern = Glob::new(pattern)
            .map(Glob::into_owned)
            .map_err(|e| KbcmError::InvalidFilePattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { pattern, store })
    }

    /// Declarative files at the top level of `directory`, sorted by name
    pub fn declarative_files(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| KbcmError::IoError {
                message: format!("Failed to read {}: {e}", directory.display()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if name == SOURCE_MARKER_FILE {
                continue;
            }
            if self.pattern.matched(&CandidatePath::from(name.as_ref())).is_some() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Import every declarative file of `directory`; returns the number loaded
    pub fn import_all(&self, directory: &Path) -> Result<usize> {
        let files = self.declarative_files(directory)?;
        for file in &files {
            debug!(file = %file.display(), "Loading declarative file");
            self.store.load_declarative_file(file)?;
        }
        Ok(files.len())
    }
}
