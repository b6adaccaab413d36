//! Verbatim copy tasks for images and top-level files.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::paths::{has_extension, Paths, IMAGE_EXTENSIONS, PAGE_EXTENSIONS};
use crate::task::TaskError;

/// Copy every matched image from `{src}/images` into `{dist}/images`,
/// preserving the relative directory structure.
pub(crate) fn images(paths: &Paths) -> Result<usize, TaskError> {
    copy_tree(&paths.image_dir, &paths.dist_images, |path| {
        has_extension(path, &IMAGE_EXTENSIONS)
    })
}

/// Copy every top-level `{src}/*.{html,txt}` file to the destination root.
pub(crate) fn files(paths: &Paths) -> Result<usize, TaskError> {
    if !paths.src_root.is_dir() {
        return Ok(0);
    }

    let entries =
        fs::read_dir(&paths.src_root).map_err(|e| TaskError::ReadError(e.to_string()))?;

    fs::create_dir_all(&paths.dist_root).map_err(|e| TaskError::WriteError(e.to_string()))?;

    let mut copied = 0;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let source = entry.path();
        if !source.is_file() || !has_extension(&source, &PAGE_EXTENSIONS) {
            continue;
        }

        let dest = paths.dist_root.join(entry.file_name());
        fs::copy(&source, &dest).map_err(|e| {
            TaskError::WriteError(format!("{} -> {}: {e}", source.display(), dest.display()))
        })?;
        copied += 1;
    }

    Ok(copied)
}

/// Copy the files under `from` that pass `filter` into `to`, preserving
/// relative paths. Copies run in parallel; a missing source tree copies
/// nothing.
pub(crate) fn copy_tree(
    from: &Path,
    to: &Path,
    filter: impl Fn(&Path) -> bool,
) -> Result<usize, TaskError> {
    if !from.is_dir() {
        return Ok(0);
    }

    let pairs: Vec<(PathBuf, PathBuf)> = WalkDir::new(from)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && filter(path))
        .map(|path| {
            let relative = path.strip_prefix(from).unwrap_or(&path).to_path_buf();
            let dest = to.join(relative);
            (path, dest)
        })
        .collect();

    for (_, dest) in &pairs {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| TaskError::WriteError(e.to_string()))?;
        }
    }

    pairs.par_iter().try_for_each(|(source, dest)| {
        fs::copy(source, dest).map(|_| ()).map_err(|e| {
            TaskError::WriteError(format!("{} -> {}: {e}", source.display(), dest.display()))
        })
    })?;

    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths() -> (tempfile::TempDir, Paths) {
        let temp = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(temp.path().join("src"), temp.path().join("dist"));
        fs::create_dir_all(&paths.src_root).unwrap();
        (temp, paths)
    }

    #[test]
    fn copies_images_recursively() {
        let (_temp, paths) = temp_paths();

        fs::create_dir_all(paths.image_dir.join("icons")).unwrap();
        fs::write(paths.image_dir.join("hero.jpg"), b"jpg").unwrap();
        fs::write(paths.image_dir.join("icons").join("logo.svg"), b"svg").unwrap();
        fs::write(paths.image_dir.join("notes.md"), b"skipped").unwrap();

        let copied = images(&paths).unwrap();

        assert_eq!(copied, 2);
        assert!(paths.dist_images.join("hero.jpg").exists());
        assert!(paths.dist_images.join("icons").join("logo.svg").exists());
        assert!(!paths.dist_images.join("notes.md").exists());
    }

    #[test]
    fn missing_image_tree_copies_nothing() {
        let (_temp, paths) = temp_paths();

        assert_eq!(images(&paths).unwrap(), 0);
    }

    #[test]
    fn copies_only_top_level_pages() {
        let (_temp, paths) = temp_paths();

        fs::create_dir_all(paths.src_root.join("deep")).unwrap();
        fs::write(paths.src_root.join("index.html"), b"<html></html>").unwrap();
        fs::write(paths.src_root.join("robots.txt"), b"User-agent: *").unwrap();
        fs::write(paths.src_root.join("main.scss"), b"skipped").unwrap();
        fs::write(paths.src_root.join("deep").join("page.html"), b"skipped").unwrap();

        let copied = files(&paths).unwrap();

        assert_eq!(copied, 2);
        assert!(paths.dist_root.join("index.html").exists());
        assert!(paths.dist_root.join("robots.txt").exists());
        assert!(!paths.dist_root.join("main.scss").exists());
        assert!(!paths.dist_root.join("deep").exists());
    }
}
