//! Git operations for materializing component artifacts
//!
//! Only cloning is needed: an artifact directory, once present, is never
//! updated by kbcm. Authentication is delegated to git's native system
//! (SSH agent, keys in ~/.ssh/, credential helpers).

mod auth;
mod error;
mod url;

use std::path::Path;

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use crate::error::{KbcmError, Result};

pub use error::describe_clone_error;
pub use url::normalize_clone_url;

/// Clone a git repository into `target`
///
/// `target` must not exist yet or be an empty directory. A shallow clone
/// (depth 1) is only requested for remote URLs; libgit2 refuses depth for
/// local transports.
pub fn clone(url: &str, target: &Path, shallow: bool) -> Result<Repository> {
    let mut callbacks = RemoteCallbacks::new();
    auth::install_credential_callback(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    if shallow && !url::is_local(url) {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let url_to_clone = normalize_clone_url(url);
    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| KbcmError::GitCloneFailed {
            url: url.to_string(),
            reason: describe_clone_error(&e),
        })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo_with_file(dir: &Path, name: &str, content: &str) {
        let repo = Repository::init(dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = git2::Signature::now("Test User", "test@example.com").unwrap();
        repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .unwrap();
    }

    #[test]
    fn test_clone_local_repository() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        init_repo_with_file(&source, "component.scs", "concept_x -> y;;\n");

        let target = temp.path().join("target");
        let url = format!("file://{}", source.display());
        clone(&url, &target, true).unwrap();

        assert!(target.join("component.scs").is_file());
    }

    #[test]
    fn test_clone_missing_repository_fails() {
        let temp = TempDir::new().unwrap();
        let url = format!("file://{}", temp.path().join("nowhere").display());

        let result = clone(&url, &temp.path().join("target"), true);
        match result {
            Err(KbcmError::GitCloneFailed { url: reported, .. }) => assert_eq!(reported, url),
            Err(other) => panic!("Expected GitCloneFailed, got {other:?}"),
            Ok(_) => panic!("Expected clone of a missing repository to fail"),
        }
    }
}
