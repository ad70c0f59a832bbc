//! Manager configuration (kbcm.yaml) data structures

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KbcmError, Result};
use crate::importer::DEFAULT_DECLARATIVE_PATTERN;

/// Default configuration file name, looked up in the current directory
pub const CONFIG_FILE: &str = "kbcm.yaml";

pub const ENV_SPECIFICATIONS_DIR: &str = "KBCM_SPECIFICATIONS_DIR";
pub const ENV_KNOWLEDGE_BASE: &str = "KBCM_KNOWLEDGE_BASE";
pub const ENV_KB_SOURCES_DIR: &str = "KBCM_KB_SOURCES_DIR";

const DATA_DIR: &str = "kbcm";
const SPECIFICATIONS_DIR: &str = "specifications";
const KB_SOURCES_DIR: &str = "kb";
const KNOWLEDGE_BASE_FILE: &str = "kb.yaml";
const DEFAULT_FETCH_HOST: &str = "https://github.com/";

/// File representation; absent fields fall back to defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    specifications_dir: Option<PathBuf>,
    knowledge_base: Option<PathBuf>,
    kb_sources_dir: Option<PathBuf>,
    fetch_hosts: Option<Vec<String>>,
    declarative_pattern: Option<String>,
    jobs: Option<usize>,
    shallow_clone: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerConfig {
    /// Root of the per-artifact clone directories
    pub specifications_dir: PathBuf,
    /// Knowledge base snapshot the registry is read from
    pub knowledge_base: PathBuf,
    /// Directory imported declarative files are copied to
    pub kb_sources_dir: PathBuf,
    /// Location prefixes artifacts are fetched from
    pub fetch_hosts: Vec<String>,
    pub declarative_pattern: String,
    pub jobs: usize,
    pub shallow_clone: bool,
}

impl ManagerConfig {
    /// Load the configuration
    ///
    /// With `path` set the file must exist. Without it `kbcm.yaml` in the
    /// current directory is used if present, built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        let base_dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()?,
        };

        if !file.is_file() {
            if explicit {
                return Err(KbcmError::ConfigNotFound {
                    path: file.display().to_string(),
                });
            }
            return Self::resolve(ConfigFile::default(), &base_dir);
        }

        let content = fs::read_to_string(&file).map_err(|e| KbcmError::ConfigParseFailed {
            path: file.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&content, &base_dir).map_err(|e| match e {
            KbcmError::ConfigParseFailed { reason, .. } => KbcmError::ConfigParseFailed {
                path: file.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse configuration from YAML; relative paths are resolved against `base_dir`
    pub fn from_yaml(yaml: &str, base_dir: &Path) -> Result<Self> {
        let file: ConfigFile = if yaml.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        Self::resolve(file, base_dir)
    }

    fn resolve(file: ConfigFile, base_dir: &Path) -> Result<Self> {
        let specifications_dir = match env_path(ENV_SPECIFICATIONS_DIR) {
            Some(dir) => dir,
            None => match file.specifications_dir {
                Some(dir) => base_dir.join(dir),
                None => default_specifications_dir()?,
            },
        };

        let knowledge_base = env_path(ENV_KNOWLEDGE_BASE).unwrap_or_else(|| {
            base_dir.join(file.knowledge_base.unwrap_or_else(|| PathBuf::from(KNOWLEDGE_BASE_FILE)))
        });

        let kb_sources_dir = env_path(ENV_KB_SOURCES_DIR)
            .or_else(|| file.kb_sources_dir.map(|dir| base_dir.join(dir)))
            .unwrap_or_else(|| match specifications_dir.parent() {
                Some(parent) => parent.join(KB_SOURCES_DIR),
                None => specifications_dir.join(KB_SOURCES_DIR),
            });

        let config = Self {
            specifications_dir,
            knowledge_base,
            kb_sources_dir,
            fetch_hosts: file
                .fetch_hosts
                .unwrap_or_else(|| vec![DEFAULT_FETCH_HOST.to_string()]),
            declarative_pattern: file
                .declarative_pattern
                .unwrap_or_else(|| DEFAULT_DECLARATIVE_PATTERN.to_string()),
            jobs: file.jobs.unwrap_or(1),
            shallow_clone: file.shallow_clone.unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(KbcmError::ConfigInvalid {
                message: "jobs must be at least 1".to_string(),
            });
        }
        if self.fetch_hosts.iter().any(|host| host.trim().is_empty()) {
            return Err(KbcmError::ConfigInvalid {
                message: "fetch_hosts must not contain empty entries".to_string(),
            });
        }
        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Platform data directory (XDG on Linux, Application Support on macOS) with a `kbcm` subdirectory
fn default_specifications_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| KbcmError::ConfigInvalid {
        message: "Could not determine data directory, set specifications_dir".to_string(),
    })?;
    Ok(base.join(DATA_DIR).join(SPECIFICATIONS_DIR))
}
