//! Knowledge base source tree as an import target
//!
//! Loading a file stages it under `<kb_sources_dir>/<artifact>/<file>`, where
//! the knowledge base builder picks it up. A file is rejected when it is not
//! UTF-8 text or has no content.

use std::fs;
use std::path::{Path, PathBuf};

use super::TargetStore;
use crate::error::{KbcmError, Result};

#[derive(Debug, Clone)]
pub struct KbSourceStore {
    root: PathBuf,
}

impl KbSourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `source` ends up once loaded
    pub fn staged_path(&self, source: &Path) -> Option<PathBuf> {
        let file_name = source.file_name()?;
        let artifact = source.parent().and_then(Path::file_name)?;
        Some(self.root.join(artifact).join(file_name))
    }
}

fn import_failed(path: &Path, reason: impl Into<String>) -> KbcmError {
    KbcmError::ImportFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

impl TargetStore for KbSourceStore {
    fn load_declarative_file(&self, path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|e| import_failed(path, e.to_string()))?;
        let content =
            String::from_utf8(bytes).map_err(|_| import_failed(path, "file is not valid UTF-8"))?;
        if content.trim().is_empty() {
            return Err(import_failed(path, "file is blank"));
        }

        let target = self
            .staged_path(path)
            .ok_or_else(|| import_failed(path, "file is not inside an artifact directory"))?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| import_failed(path, e.to_string()))?;
        }
        fs::write(&target, content).map_err(|e| import_failed(path, e.to_string()))
    }
}
