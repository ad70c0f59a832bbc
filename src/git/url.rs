//! URL normalization for libgit2
//!
//! libgit2 does not accept SCP-style SSH URLs (`git@host:path`) and is picky
//! about relative `file://` URLs, so both are rewritten before cloning.

use std::borrow::Cow;

/// Whether `url` refers to a repository on the local filesystem
pub fn is_local(url: &str) -> bool {
    url.starts_with("file://") || std::path::Path::new(url).is_absolute()
}

/// Rewrite `url` into a form libgit2 can clone
pub fn normalize_clone_url(url: &str) -> Cow<'_, str> {
    if let Some(rest) = url.strip_prefix("git@") {
        return Cow::Owned(scp_to_ssh(rest));
    }
    if let Some(rest) = url.strip_prefix("file://") {
        return normalize_file_path(url, rest);
    }
    Cow::Borrowed(url)
}

/// `host:path` -> `ssh://git@host/path`
fn scp_to_ssh(rest: &str) -> String {
    match rest.split_once(':') {
        Some((host, path)) => {
            let path = path.trim_start_matches('/');
            format!("ssh://git@{host}/{path}")
        }
        None => format!("ssh://git@{rest}"),
    }
}

fn normalize_file_path<'a>(url: &'a str, rest: &str) -> Cow<'a, str> {
    if rest.contains('\\') {
        let path = rest.replace('\\', "/");
        return Cow::Owned(format!("file:///{}", path.trim_start_matches('/')));
    }
    if !rest.is_empty() && !rest.starts_with('/') {
        return Cow::Owned(format!("file:///{rest}"));
    }
    Cow::Borrowed(url)
}
