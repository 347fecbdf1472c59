//! File Enumerator: lists the markdown files under the conversion root.

use crate::contract::ConvertError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Extension a file must carry to be picked up. Compared case-sensitively.
pub const MARKDOWN_EXTENSION: &str = "md";

/// List the `.md` files under `root`.
///
/// Without `recursive`, only the immediate entries of `root` are considered;
/// otherwise the full subtree is walked. Directories are never yielded.
/// Symlinks to files are kept; symlinked directories are not descended into.
/// A dangling link is kept too, so the parse stage reports it as unreadable.
/// Entries are sorted by file name within each directory, so the result is
/// deterministic across platforms.
///
/// Any traversal error aborts the whole run.
pub fn enumerate(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ConvertError> {
    info!(root = %root.display(), recursive, "Enumerating markdown files");

    let meta = std::fs::metadata(root).map_err(|e| {
        error!(error = ?e, root = %root.display(), "Enumeration root is unreadable");
        ConvertError::io(root, e)
    })?;
    if !meta.is_dir() {
        error!(root = %root.display(), "Enumeration root is not a directory");
        return Err(ConvertError::io(
            root,
            io::Error::other("enumeration root is not a directory"),
        ));
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry_res in walker {
        let entry = entry_res.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            error!(error = %e, path = %path.display(), "Failed to read directory entry");
            ConvertError::Enumerate { path, source: e }
        })?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            if entry.path().is_dir() {
                debug!(path = %entry.path().display(), "Not following directory link");
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }
        let path = entry.into_path();
        if !is_markdown(&path) {
            debug!(path = %path.display(), "Skipping non-markdown file");
            continue;
        }
        files.push(path);
    }

    info!(count = files.len(), "Enumeration complete");
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(MARKDOWN_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};
    use tempfile::tempdir;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }

    fn fixture() -> tempfile::TempDir {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        create_dir_all(root.join("guide/deep")).unwrap();
        create_dir_all(root.join("empty.md")).unwrap();
        write(root.join("b.md"), "b").unwrap();
        write(root.join("a.md"), "a").unwrap();
        write(root.join("notes.txt"), "txt").unwrap();
        write(root.join("UPPER.MD"), "upper").unwrap();
        write(root.join("guide/intro.md"), "intro").unwrap();
        write(root.join("guide/deep/inner.md"), "inner").unwrap();
        tmp
    }

    #[test]
    fn flat_listing_keeps_only_top_level_markdown_files() {
        let tmp = fixture();
        let files = enumerate(tmp.path(), false).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["a.md", "b.md"]);
    }

    #[test]
    fn recursive_walk_visits_every_depth_in_sorted_order() {
        let tmp = fixture();
        let files = enumerate(tmp.path(), true).unwrap();
        assert_eq!(
            names(tmp.path(), &files),
            vec!["a.md", "b.md", "guide/deep/inner.md", "guide/intro.md"]
        );
    }

    #[test]
    fn directory_named_like_markdown_is_not_yielded() {
        let tmp = fixture();
        let files = enumerate(tmp.path(), true).unwrap();
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_markdown_files_are_listed() {
        use std::os::unix::fs::symlink;

        let tmp = tempdir().unwrap();
        let docs = tmp.path().join("docs");
        let shared = tmp.path().join("ext");
        create_dir_all(&docs).unwrap();
        create_dir_all(&shared).unwrap();
        write(shared.join("shared.md"), "shared").unwrap();
        write(docs.join("own.md"), "own").unwrap();
        symlink(shared.join("shared.md"), docs.join("shared.md")).unwrap();
        symlink(tmp.path().join("missing.md"), docs.join("dangling.md")).unwrap();
        symlink(&shared, docs.join("linked-dir")).unwrap();

        let files = enumerate(&docs, true).unwrap();
        assert_eq!(
            names(&docs, &files),
            vec!["dangling.md", "own.md", "shared.md"]
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = tempdir().unwrap();
        let err = enumerate(&tmp.path().join("nope"), false).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn file_as_root_is_fatal() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("single.md");
        write(&file, "---\n---\n").unwrap();
        let err = enumerate(&file, true).unwrap_err();
        assert!(err.to_string().contains("not a directory"), "got {err}");
    }
}
