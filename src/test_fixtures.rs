//! Test fixtures shared by the unit tests.
//!
//! Provides recording doubles for the network and store boundaries, and a
//! [`Harness`] wiring them into a real fetcher and importer rooted in a
//! temp directory.
//!
//! ```ignore
//! use crate::test_fixtures::{component, registry, Harness};
//!
//! let registry = registry(&[component("AppX", &["LibY"]), component("LibY", &[])]);
//! let harness = Harness::new();
//! let resolver = harness.resolver(&registry);
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::error::{KbcmError, Result};
use crate::fetcher::{ArtifactCloner, ArtifactFetcher};
use crate::importer::{DEFAULT_DECLARATIVE_PATTERN, Importer, TargetStore};
use crate::path_utils;
use crate::registry::YamlRegistry;
use crate::resolver::Resolver;

/// Host prefix the fixtures' artifact locations live under
pub const TEST_HOST: &str = "https://github.com/";

/// Location the fixtures give component `id`
pub fn location_of(id: &str) -> String {
    format!("{TEST_HOST}org/{}", id.to_lowercase())
}

/// Records clone calls and writes one `<name>.scs` file per artifact
#[derive(Clone, Default)]
pub struct RecordingCloner {
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<HashSet<String>>,
}

impl RecordingCloner {
    /// Clones of any of `locations` fail with a network error
    pub fn failing_on(locations: &[&str]) -> Self {
        Self {
            failing: Arc::new(locations.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ArtifactCloner for RecordingCloner {
    fn clone_into(&self, location: &str, target: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(location.to_string());
        if self.failing.contains(location) {
            return Err(KbcmError::GitCloneFailed {
                url: location.to_string(),
                reason: "Network error".to_string(),
            });
        }
        let name = path_utils::artifact_dir_name(location).unwrap();
        fs::create_dir_all(target)?;
        fs::write(target.join(format!("{name}.scs")), format!("{name} -> concept;;\n"))?;
        Ok(())
    }
}

/// Records loaded file names; rejects the configured ones
#[derive(Clone, Default)]
pub struct RecordingStore {
    loaded: Arc<Mutex<Vec<String>>>,
    rejected: Arc<HashSet<String>>,
}

impl RecordingStore {
    pub fn rejecting(file_names: &[&str]) -> Self {
        Self {
            rejected: Arc::new(file_names.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }
}

impl TargetStore for RecordingStore {
    fn load_declarative_file(&self, path: &Path) -> Result<()> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.rejected.contains(&name) {
            return Err(KbcmError::ImportFailed {
                path: path.display().to_string(),
                reason: "malformed".to_string(),
            });
        }
        self.loaded.lock().unwrap().push(name);
        Ok(())
    }
}

/// Fetcher and importer over recording doubles, rooted in a temp directory
pub struct Harness {
    pub temp: TempDir,
    pub cloner: RecordingCloner,
    pub store: RecordingStore,
    pub fetcher: ArtifactFetcher,
    pub importer: Importer,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(RecordingCloner::default(), RecordingStore::default())
    }

    pub fn with(cloner: RecordingCloner, store: RecordingStore) -> Self {
        let temp = TempDir::new().unwrap();
        let fetcher = ArtifactFetcher::new(
            temp.path().join("specifications"),
            vec![TEST_HOST.to_string()],
            Box::new(cloner.clone()),
        );
        let importer = Importer::new(DEFAULT_DECLARATIVE_PATTERN, Box::new(store.clone())).unwrap();
        Self {
            temp,
            cloner,
            store,
            fetcher,
            importer,
        }
    }

    pub fn specifications_dir(&self) -> PathBuf {
        self.temp.path().join("specifications")
    }

    pub fn resolver<'a>(&'a self, registry: &'a YamlRegistry) -> Resolver<'a> {
        Resolver::new(registry, &self.fetcher, &self.importer)
    }
}

/// YAML entity for a sound component depending on `dependencies`
pub fn component(id: &str, dependencies: &[&str]) -> String {
    entity(id, true, Some(&location_of(id)), true, dependencies)
}

/// YAML entity with every validation-relevant part configurable
pub fn entity(
    id: &str,
    reusable: bool,
    address: Option<&str>,
    installation_method: bool,
    dependencies: &[&str],
) -> String {
    let mut yaml = format!("  - id: {id}\n");
    if reusable {
        yaml.push_str("    classes: [concept_reusable_component]\n");
    }
    if let Some(address) = address {
        yaml.push_str(&format!(
            "    attributes:\n      nrel_component_address: \"{address}\"\n"
        ));
    }
    yaml.push_str("    relations:\n");
    if installation_method {
        yaml.push_str(
            "      nrel_installation_method: [concept_component_dependencies_installation_method]\n",
        );
    }
    yaml.push_str(&format!(
        "      nrel_component_dependencies: [{}]\n",
        dependencies.join(", ")
    ));
    yaml
}

/// Registry holding `entities`
pub fn registry(entities: &[String]) -> YamlRegistry {
    let yaml = format!("entities:\n{}", entities.concat());
    YamlRegistry::from_yaml(&yaml).unwrap()
}
