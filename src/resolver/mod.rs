//! Dependency resolution and per-component installation
//!
//! [`Resolver::resolve`] walks the dependency graph depth-first from one
//! component:
//!
//! 1. A component already in the visited set is skipped with an empty
//!    success. This handles shared (diamond) dependencies and turns cycles
//!    into termination.
//! 2. The component is looked up and validated.
//! 3. Its dependencies are resolved in declaration order. The first failing
//!    dependency aborts the walk: remaining siblings and the component's own
//!    fetch and import are not attempted.
//! 4. The component's artifact is fetched and imported, and the component is
//!    appended after everything its dependencies installed.

mod result;
mod visited;

use tracing::{debug, error, info, warn};

use crate::error::KbcmError;
use crate::fetcher::ArtifactFetcher;
use crate::importer::Importer;
use crate::registry::{ComponentDescriptor, Registry, RegistryAdapter};
use crate::validator;

pub use result::{InstallFailure, InstallResult, Outcome, Stage};
pub use visited::VisitedSet;

/// Installs one component tree against a registry, fetcher and importer
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    registry: RegistryAdapter<'a>,
    fetcher: &'a ArtifactFetcher,
    importer: &'a Importer,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a dyn Registry,
        fetcher: &'a ArtifactFetcher,
        importer: &'a Importer,
    ) -> Self {
        Self {
            registry: RegistryAdapter::new(registry),
            fetcher,
            importer,
        }
    }

    /// Install `identifier` and its dependencies, dependencies first
    pub fn resolve(&self, identifier: &str, visited: &VisitedSet) -> InstallResult {
        if !visited.insert(identifier) {
            debug!(component = identifier, "Component already handled in this installation");
            return InstallResult::success(Vec::new());
        }

        let descriptor = self.registry.describe(identifier);
        if !descriptor.is_valid() {
            warn!(component = identifier, "Component not found. Unable to install");
            return InstallResult::failure(
                Vec::new(),
                InstallFailure::new(
                    identifier,
                    Stage::Lookup,
                    KbcmError::ComponentNotFound {
                        name: identifier.to_string(),
                    },
                ),
            );
        }

        debug!(component = identifier, "Validating component");
        if let Err(reason) = validator::validate(&descriptor) {
            warn!(component = identifier, %reason, "Unable to install component");
            return InstallResult::failure(
                Vec::new(),
                InstallFailure::new(
                    identifier,
                    Stage::Validation,
                    KbcmError::ComponentValidationFailed {
                        name: identifier.to_string(),
                        reason,
                    },
                ),
            );
        }
        debug!(component = identifier, "Component is specified correctly");

        let mut installed = Vec::new();
        for edge in self.registry.dependencies(&descriptor) {
            info!(component = %edge.from, dependency = %edge.to, "Installing dependency");
            let dependency = self.resolve(&edge.to, visited);
            installed.extend(dependency.installed);
            if let Outcome::Failure(failure) = dependency.outcome {
                error!(component = identifier, dependency = %edge.to, "Dependency is not installed");
                return InstallResult::failure(installed, failure.through(identifier));
            }
        }

        if let Err(failure) = self.materialize(&descriptor) {
            error!(component = identifier, stage = %failure.stage, error = %failure.error, "Component is not installed");
            return InstallResult::failure(installed, failure);
        }

        installed.push(identifier.to_string());
        InstallResult::success(installed)
    }

    /// Fetch and import the component's own artifact
    fn materialize(&self, descriptor: &ComponentDescriptor) -> Result<(), InstallFailure> {
        let identifier = descriptor.identifier.as_str();
        if let Some(method) = descriptor.installation_method {
            let method = self.registry.identifier_of(method).unwrap_or_default();
            debug!(component = identifier, method = %method, "Using installation method");
        }

        let location = descriptor.artifact_location.as_deref().unwrap_or_default();
        let fetched = self
            .fetcher
            .fetch(location)
            .map_err(|e| InstallFailure::new(identifier, Stage::Fetch, e))?;

        let Some(artifact) = fetched else {
            info!(component = identifier, location, "Artifact is not fetched from remote, skipping download");
            return Ok(());
        };

        let count = self
            .importer
            .import_all(&artifact.directory)
            .map_err(|e| InstallFailure::new(identifier, Stage::Import, e))?;
        info!(
            component = identifier,
            directory = %artifact.directory.display(),
            files = count,
            cloned = artifact.newly_created,
            "Component installed"
        );
        Ok(())
    }
}
