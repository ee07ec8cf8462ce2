//! Moving file sets between memory and disk

use anyhow::{bail, Context, Result};
use nodeforge_model::GeneratedFileSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Tool and cache directories never read back
const SKIPPED_DIRS: [&str; 3] = ["__pycache__", "node_modules", "venv"];

/// Write every file under `root`, creating directories as needed
///
/// Nothing is written when `overwrite` is false and any target exists.
pub fn write_file_set(files: &GeneratedFileSet, root: &Path, overwrite: bool) -> Result<usize> {
    let mut targets: Vec<(PathBuf, &str)> = Vec::with_capacity(files.len());
    for (path, content) in files {
        let target = path
            .segments()
            .iter()
            .fold(root.to_path_buf(), |acc, segment| acc.join(segment));
        if !overwrite && target.exists() {
            bail!("{} already exists; pass --force to overwrite", target.display());
        }
        targets.push((target, content));
    }

    for (target, content) in &targets {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(target, content).with_context(|| format!("writing {}", target.display()))?;
        tracing::debug!(path = %target.display(), bytes = content.len(), "file written");
    }
    Ok(targets.len())
}

/// Read a project tree back into a file set
///
/// Hidden entries and cache directories are skipped, as are files that are
/// not UTF-8 text or whose names cannot be file-set paths.
pub fn read_file_set(root: &Path) -> Result<GeneratedFileSet> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut files = GeneratedFileSet::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root)?;
        let Some(name) = slash_path(relative) else {
            tracing::warn!(path = %relative.display(), "path is not UTF-8; skipped");
            continue;
        };

        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(path = %name, "not UTF-8 text; skipped");
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", entry.path().display())),
        };
        if let Err(e) = files.insert_str(&name, content) {
            tracing::warn!(path = %name, error = %e, "skipped");
        }
    }
    Ok(files)
}

fn slash_path(path: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = path.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|parts| parts.join("/"))
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeforge_test_utils::file_set;
    use pretty_assertions::assert_eq;

    fn sample() -> GeneratedFileSet {
        file_set(&[
            ("flow.py", "x = 1\n"),
            ("docs/design.md", "# Title\n"),
            ("tests/test_flow.py", "def test_x():\n    pass\n"),
        ])
    }

    #[test]
    fn written_tree_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let files = sample();

        assert_eq!(write_file_set(&files, dir.path(), false).unwrap(), 3);
        assert!(dir.path().join("docs").join("design.md").is_file());

        let back = read_file_set(dir.path()).unwrap();
        assert_eq!(back, files);
    }

    #[test]
    fn existing_files_are_not_overwritten_without_force() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("flow.py"), "keep me\n").unwrap();

        let err = write_file_set(&sample(), dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(dir.path().join("flow.py")).unwrap(), "keep me\n");
        assert!(!dir.path().join("docs").exists());

        write_file_set(&sample(), dir.path(), true).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("flow.py")).unwrap(), "x = 1\n");
    }

    #[test]
    fn caches_and_binary_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_file_set(&sample(), dir.path(), false).unwrap();
        fs::create_dir_all(dir.path().join("__pycache__")).unwrap();
        fs::write(dir.path().join("__pycache__").join("flow.py"), "cached\n").unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("HEAD"), "ref\n").unwrap();
        fs::write(dir.path().join("logo.png"), [0xff_u8, 0xfe, 0x00]).unwrap();

        let back = read_file_set(dir.path()).unwrap();
        assert_eq!(back.paths(), ["docs/design.md", "flow.py", "tests/test_flow.py"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_file_set(&dir.path().join("nope")).is_err());
    }
}
