//! Structural checks applied to a component before it is installed
//!
//! Checks run in order and stop at the first failure:
//! - the component exists;
//! - the component is a reusable component;
//! - the component has a non-empty artifact location;
//! - the component has an installation method.

use serde::Serialize;
use thiserror::Error;

use crate::registry::ComponentDescriptor;

/// Reason a component failed validation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("component not found")]
    UnknownComponent,

    #[error("component is not a reusable component")]
    NotReusable,

    #[error("component address not found")]
    MissingArtifactLocation,

    #[error("component address is empty")]
    EmptyArtifactLocation,

    #[error("component installation method not found")]
    MissingInstallationMethod,
}

/// Validate a component descriptor
pub fn validate(descriptor: &ComponentDescriptor) -> Result<(), ValidationFailure> {
    if !descriptor.is_valid() {
        return Err(ValidationFailure::UnknownComponent);
    }

    if !descriptor.is_reusable {
        return Err(ValidationFailure::NotReusable);
    }

    match descriptor.artifact_location.as_deref() {
        None => return Err(ValidationFailure::MissingArtifactLocation),
        Some(location) if location.trim().is_empty() => {
            return Err(ValidationFailure::EmptyArtifactLocation);
        }
        Some(_) => {}
    }

    if descriptor.installation_method.is_none() {
        return Err(ValidationFailure::MissingInstallationMethod);
    }

    Ok(())
}
