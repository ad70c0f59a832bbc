//! Result values returned by every resolution step

use miette::Diagnostic;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::error::KbcmError;

/// Stage of the installation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Lookup,
    Validation,
    Fetch,
    Import,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Lookup => "lookup",
            Stage::Validation => "validation",
            Stage::Fetch => "fetch",
            Stage::Import => "import",
        };
        f.write_str(name)
    }
}

/// Why a component could not be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallFailure {
    /// Component the failure originated in
    pub component: String,
    pub stage: Stage,
    /// Path from the requested component down to `component`
    pub chain: Vec<String>,
    pub error: KbcmError,
}

impl InstallFailure {
    pub fn new(component: impl Into<String>, stage: Stage, error: KbcmError) -> Self {
        let component = component.into();
        Self {
            chain: vec![component.clone()],
            component,
            stage,
            error,
        }
    }

    /// Record that `dependent` failed because of this failure
    #[must_use]
    pub fn through(mut self, dependent: &str) -> Self {
        self.chain.insert(0, dependent.to_string());
        self
    }

    /// Component the failing chain started from
    pub fn root(&self) -> &str {
        self.chain.first().map_or(self.component.as_str(), String::as_str)
    }

    /// Whether the failure came from a dependency rather than the root itself
    pub fn is_dependency_failure(&self) -> bool {
        self.chain.len() > 1
    }
}

impl std::fmt::Display for InstallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dependency_failure() {
            write!(
                f,
                "{} failed at {} ({}): {}",
                self.component,
                self.stage,
                self.chain.join(" -> "),
                self.error
            )
        } else {
            write!(f, "{} failed at {}: {}", self.component, self.stage, self.error)
        }
    }
}

impl Serialize for InstallFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InstallFailure", 5)?;
        state.serialize_field("component", &self.component)?;
        state.serialize_field("stage", &self.stage)?;
        state.serialize_field("chain", &self.chain)?;
        state.serialize_field("error", &self.error.to_string())?;
        state.serialize_field("code", &self.error.code().map(|c| c.to_string()))?;
        state.end()
    }
}

/// Outcome of a resolution step, independent of what was installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(InstallFailure),
}

/// Installed components in dependency-first order plus the outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub installed: Vec<String>,
    pub outcome: Outcome,
}

impl InstallResult {
    pub fn success(installed: Vec<String>) -> Self {
        Self {
            installed,
            outcome: Outcome::Success,
        }
    }

    pub fn failure(installed: Vec<String>, failure: InstallFailure) -> Self {
        Self {
            installed,
            outcome: Outcome::Failure(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    pub fn failure_ref(&self) -> Option<&InstallFailure> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }
}
