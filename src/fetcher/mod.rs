//! Artifact fetching
//!
//! An artifact location maps to exactly one directory under the
//! specifications root (`https://github.com/org/liby` -> `<root>/liby`).
//! If that directory exists the artifact counts as materialized and no
//! network operation happens. Otherwise the repository is cloned into a
//! staging directory next to it and renamed into place, so an interrupted
//! clone never leaves a directory the existence check would accept.
//!
//! Only locations starting with one of the configured host prefixes are
//! fetched; anything else is assumed to be present in the store already.

mod locks;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use tracing::{debug, info};

use crate::error::{KbcmError, Result};
use crate::git;
use crate::path_utils;
use locks::DirectoryLocks;

/// Marker file recording which location a directory was cloned from
pub const SOURCE_MARKER_FILE: &str = ".kbcm_source";

/// Staging directory prefix for in-flight clones
const STAGING_PREFIX: &str = ".kbcm-clone-";

/// Materializes a remote location into a local directory
pub trait ArtifactCloner: Send + Sync {
    /// Populate `target` (which does not exist yet) with the content at `location`
    fn clone_into(&self, location: &str, target: &Path) -> Result<()>;
}

/// Clones artifacts with libgit2
#[derive(Debug, Clone, Copy)]
pub struct GitCloner {
    shallow: bool,
}

impl GitCloner {
    pub fn new(shallow: bool) -> Self {
        Self { shallow }
    }
}

impl ArtifactCloner for GitCloner {
    fn clone_into(&self, location: &str, target: &Path) -> Result<()> {
        git::clone(location, target, self.shallow).map(|_| ())
    }
}

/// A materialized artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub directory: PathBuf,
    /// `false` when the directory already existed and nothing was cloned
    pub newly_created: bool,
}

/// Fetches component artifacts into the specifications root
pub struct ArtifactFetcher {
    root: PathBuf,
    hosts: Vec<String>,
    cloner: Box<dyn ArtifactCloner>,
    locks: DirectoryLocks,
}

impl ArtifactFetcher {
    pub fn new(root: impl Into<PathBuf>, hosts: Vec<String>, cloner: Box<dyn ArtifactCloner>) -> Self {
        Self {
            root: root.into(),
            hosts,
            cloner,
            locks: DirectoryLocks::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `location` is hosted somewhere kbcm knows how to fetch from
    pub fn is_recognized(&self, location: &str) -> bool {
        let location = location.trim();
        self.hosts.iter().any(|host| location.starts_with(host.as_str()))
    }

    /// Local directory for `location`
    pub fn directory_for(&self, location: &str) -> Result<PathBuf> {
        path_utils::artifact_dir_name(location)
            .map(|name| self.root.join(name))
            .ok_or_else(|| KbcmError::InvalidArtifactLocation {
                location: location.to_string(),
            })
    }

    /// Fetch the artifact at `location`
    ///
    /// Returns `None` when the location is not on a recognized host.
    pub fn fetch(&self, location: &str) -> Result<Option<FetchedArtifact>> {
        let location = location.trim();
        if !self.is_recognized(location) {
            debug!(location, "Artifact is not on a recognized host, nothing to fetch");
            return Ok(None);
        }

        let directory = self.directory_for(location)?;
        let lock = self.locks.lock_for(&directory);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if directory.is_dir() {
            check_source_marker(&directory, location)?;
            debug!(location, directory = %directory.display(), "Artifact already materialized");
            return Ok(Some(FetchedArtifact {
                directory,
                newly_created: false,
            }));
        }

        let newly_created = self.clone_into_place(location, &directory)?;
        Ok(Some(FetchedArtifact {
            directory,
            newly_created,
        }))
    }

    fn clone_into_place(&self, location: &str, directory: &Path) -> Result<bool> {
        fs::create_dir_all(&self.root).map_err(|e| fetch_failed(location, &e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.root)
            .map_err(|e| fetch_failed(location, &e))?;
        let checkout = staging.path().join("repository");

        info!(location, directory = %directory.display(), "Cloning artifact");
        self.cloner.clone_into(location, &checkout)?;

        fs::write(checkout.join(SOURCE_MARKER_FILE), location)
            .map_err(|e| fetch_failed(location, &e))?;

        match fs::rename(&checkout, directory) {
            Ok(()) => Ok(true),
            // Another process materialized the same directory first
            Err(_) if directory.is_dir() => {
                check_source_marker(directory, location)?;
                Ok(false)
            }
            Err(e) => Err(fetch_failed(location, &e)),
        }
    }
}

fn fetch_failed(location: &str, err: &std::io::Error) -> KbcmError {
    KbcmError::ArtifactFetchFailed {
        location: location.to_string(),
        reason: err.to_string(),
    }
}

/// Location recorded in the marker file of `directory`, if any
pub fn recorded_source(directory: &Path) -> Option<String> {
    fs::read_to_string(directory.join(SOURCE_MARKER_FILE))
        .ok()
        .map(|s| s.trim().to_string())
}

fn check_source_marker(directory: &Path, location: &str) -> Result<()> {
    match recorded_source(directory) {
        Some(existing) if !same_location(&existing, location) => Err(KbcmError::ArtifactCollision {
            path: directory.display().to_string(),
            existing,
            location: location.to_string(),
        }),
        _ => Ok(()),
    }
}

fn same_location(a: &str, b: &str) -> bool {
    fn canonical(s: &str) -> &str {
        let s = s.trim().trim_end_matches('/');
        s.strip_suffix(".git").unwrap_or(s)
    }
    canonical(a) == canonical(b)
}
