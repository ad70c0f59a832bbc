//! Per-directory locks so that the existence check and the clone for one
//! artifact directory happen as a single step within the process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct DirectoryLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DirectoryLocks {
    /// Lock guarding `directory`; the same path always yields the same lock
    pub fn lock_for(&self, directory: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(directory.to_path_buf()).or_default())
    }
}
