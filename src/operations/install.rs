//! Install operation
//!
//! Runs one resolution per requested component. Requests are independent:
//! each gets a fresh visited set, and a failing request never stops its
//! siblings. With `jobs > 1` requests are spread over a scoped worker pool;
//! reports keep the request order either way.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use tracing::{error, info};

use crate::error::KbcmError;
use crate::fetcher::ArtifactFetcher;
use crate::importer::Importer;
use crate::progress::ProgressDisplay;
use crate::registry::Registry;
use crate::resolver::{InstallFailure, InstallResult, Resolver, VisitedSet};

/// Options for installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Number of top-level requests processed concurrently
    pub jobs: usize,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// Result of one requested component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestReport {
    pub identifier: String,
    pub result: InstallResult,
}

impl Serialize for RequestReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RequestReport", 4)?;
        state.serialize_field("identifier", &self.identifier)?;
        state.serialize_field("installed", &self.result.installed)?;
        state.serialize_field("success", &self.result.is_success())?;
        state.serialize_field("failure", &self.result.failure_ref())?;
        state.end()
    }
}

/// Aggregated result of an [`InstallOperation::install`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub requests: Vec<RequestReport>,
}

impl InstallReport {
    /// Installed components over all requests, first occurrence wins
    pub fn installed(&self) -> Vec<String> {
        let mut installed: Vec<String> = Vec::new();
        for name in self.requests.iter().flat_map(|r| &r.result.installed) {
            if !installed.contains(name) {
                installed.push(name.clone());
            }
        }
        installed
    }

    pub fn is_success(&self) -> bool {
        self.requests.iter().all(|r| r.result.is_success())
    }

    pub fn failures(&self) -> Vec<&InstallFailure> {
        self.requests
            .iter()
            .filter_map(|r| r.result.failure_ref())
            .collect()
    }

    /// Error for the command exit status, `None` if everything succeeded
    pub fn to_error(&self) -> Option<KbcmError> {
        let failures = self.failures();
        if failures.is_empty() {
            return None;
        }
        let names: Vec<&str> = failures.iter().map(|f| f.root()).collect();
        Some(KbcmError::InstallFailed {
            count: failures.len(),
            components: names.join(", "),
        })
    }
}

impl Serialize for InstallReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InstallReport", 4)?;
        state.serialize_field("installed", &self.installed())?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("failures", &self.failures())?;
        state.serialize_field("requests", &self.requests)?;
        state.end()
    }
}

/// High-level install operation
pub struct InstallOperation<'a> {
    resolver: Resolver<'a>,
    options: InstallOptions,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        registry: &'a dyn Registry,
        fetcher: &'a ArtifactFetcher,
        importer: &'a Importer,
        options: InstallOptions,
    ) -> Self {
        Self {
            resolver: Resolver::new(registry, fetcher, importer),
            options,
        }
    }

    /// Install every component in `identifiers`
    pub fn install(&self, identifiers: &[String]) -> InstallReport {
        self.install_with_progress(identifiers, None)
    }

    pub fn install_with_progress(
        &self,
        identifiers: &[String],
        progress: Option<&ProgressDisplay>,
    ) -> InstallReport {
        if identifiers.is_empty() {
            info!("No components requested. Installing all components is not supported, nothing to do");
            return InstallReport::default();
        }

        let jobs = self.options.jobs.clamp(1, identifiers.len());
        let requests = if jobs == 1 {
            identifiers
                .iter()
                .map(|identifier| self.run_request(identifier, progress))
                .collect()
        } else {
            self.run_parallel(identifiers, jobs, progress)
        };
        InstallReport { requests }
    }

    fn run_parallel(
        &self,
        identifiers: &[String],
        jobs: usize,
        progress: Option<&ProgressDisplay>,
    ) -> Vec<RequestReport> {
        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<RequestReport>>> = Mutex::new(vec![None; identifiers.len()]);

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| {
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(identifier) = identifiers.get(index) else {
                            break;
                        };
                        let report = self.run_request(identifier, progress);
                        slots.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(report);
                    }
                });
            }
        });

        slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .flatten()
            .collect()
    }

    fn run_request(&self, identifier: &str, progress: Option<&ProgressDisplay>) -> RequestReport {
        if let Some(progress) = progress {
            progress.start_request(identifier);
        }
        info!(component = identifier, "Installing component");

        let visited = VisitedSet::new();
        let result = self.resolver.resolve(identifier, &visited);
        match result.failure_ref() {
            None => info!(
                component = identifier,
                installed = result.installed.len(),
                visited = visited.len(),
                "Component is installed"
            ),
            Some(failure) => error!(component = identifier, %failure, "Component is not installed"),
        }

        if let Some(progress) = progress {
            progress.finish_request(identifier, result.is_success());
        }
        RequestReport {
            identifier: identifier.to_string(),
            result,
        }
    }
}
