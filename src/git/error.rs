//! Operator-facing descriptions of libgit2 clone errors

use git2::{Error, ErrorClass};

/// Coarse categories of clone failures, checked in order
const CATEGORIES: &[(&[&str], &str)] = &[
    (
        &["not found", "404", "too many redirects", "authentication replays"],
        "Repository not found",
    ),
    (&["authentication", "credentials"], "Authentication failed"),
    (&["permission denied", "access denied"], "Permission denied"),
    (
        &["connection", "network", "timeout", "timed out", "resolve host"],
        "Network error",
    ),
];

/// Describe a clone error in one short phrase
pub fn describe_clone_error(err: &Error) -> String {
    let message = err.message().to_lowercase();

    for (needles, description) in CATEGORIES {
        if needles.iter().any(|needle| message.contains(needle)) {
            return (*description).to_string();
        }
    }

    match err.class() {
        ErrorClass::Http if message.contains("certificate") => "Certificate error".to_string(),
        ErrorClass::Http if message.contains("ssl") => "SSL error".to_string(),
        ErrorClass::Http => format!("HTTP error: {}", err.message()),
        ErrorClass::Ssh => format!("SSH error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
