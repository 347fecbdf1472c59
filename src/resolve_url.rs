//! URL Resolver for site mode.
//!
//! Mirrors the MkDocs "directory URL" convention: `guide/intro.md` under the
//! docs root is served at `<base>/guide/intro/`.

use std::path::{Component, Path};
use tracing::debug;

/// Compute the canonical URL of `file` relative to `root`.
///
/// Never fails: when `file` is not under `root` (or is `root` itself) the
/// `base_url` is returned unchanged. Trailing separators on `root` are
/// irrelevant since paths are compared component-wise.
pub fn resolve_url(root: &Path, file: &Path, base_url: &str) -> String {
    let Some(segments) = relative_segments(root, file) else {
        debug!(root = %root.display(), file = %file.display(), "File is outside the root, using base URL");
        return base_url.to_string();
    };

    let mut url = String::with_capacity(base_url.len() + 64);
    url.push_str(base_url);
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(&segments.join("/"));
    url.push('/');
    url
}

/// Path components of `file` below `root`, extension stripped from the last.
fn relative_segments(root: &Path, file: &Path) -> Option<Vec<String>> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            // `..` escapes the root.
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}
