//! Cross-platform path utilities
//!
//! Lexical helpers only: nothing in here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Convert a path to a string with forward slashes
///
/// Glob patterns are always written with `/`, so relative candidate paths are
/// normalized before matching.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(to_forward_slashes(Path::new("bin\\cjpegli.exe")), "bin/cjpegli.exe");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding normal component.
///
/// `..` directly under a root is dropped (`/..` is `/`). Leading `..` of a
/// relative path are kept since there is nothing to fold them into.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }

    cleaned
}

/// Check that `candidate` stays strictly inside `root` once both are cleaned
pub fn is_strictly_within(root: &Path, candidate: &Path) -> bool {
    let root = clean_path(root);
    let candidate = clean_path(candidate);
    candidate != root && candidate.starts_with(&root)
}
