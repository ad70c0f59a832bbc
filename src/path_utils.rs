//! Path utilities for deriving artifact directory names
//!
//! Every artifact location maps to exactly one directory name, so that the
//! same component installed twice lands in the same place.

/// Characters that are unsafe in filesystem paths
/// Replaced with hyphens and collapsed: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a name safe for filesystem use.
///
/// Replaces unsafe characters with hyphens, collapses consecutive hyphens and
/// removes leading/trailing hyphens. Returns `None` if nothing usable is left.
pub fn make_path_safe(name: &str) -> Option<String> {
    let key: String = name
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    match key.as_str() {
        "" | "." | ".." => None,
        _ => Some(key),
    }
}

/// Derive the directory name for an artifact location.
///
/// Takes the last path segment of the location, ignoring surrounding
/// whitespace, trailing slashes and a trailing `.git`:
/// `https://github.com/org/liby.git` -> `liby`.
pub fn artifact_dir_name(location: &str) -> Option<String> {
    let trimmed = location.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let segment = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    // SCP-style `git@host:repo` has no slash before the name
    let segment = segment.rsplit(':').next().unwrap_or(segment);
    make_path_safe(segment)
}
