//! Batch discovery under a scan root
//!
//! A batch is any immediate subfolder of the root whose name starts with
//! `BATCH`. Images are recognized by file extension only.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::entities::Batch;

/// Prefix that marks a folder as a batch
pub const BATCH_PREFIX: &str = "BATCH";

/// File extensions counted as images (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "tif", "tiff", "bmp", "gif", "webp", "jp2",
];

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Whether a path has an image extension
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn ensure_dir(path: &Path) -> Result<(), InventoryError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(InventoryError::NotADirectory(path.to_path_buf()))
    }
}

fn file_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Immediate subdirectories of `dir`, sorted by name
fn child_dirs(dir: &Path) -> Result<Vec<DirEntry>, InventoryError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| InventoryError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry);
        }
    }
    Ok(dirs)
}

/// Names of the immediate subfolders of a batch folder
pub fn subfolders(folder: &Path) -> Result<Vec<String>, InventoryError> {
    ensure_dir(folder)?;
    Ok(child_dirs(folder)?.iter().map(file_name).collect())
}

/// Image files below `folder`, as `/`-separated paths relative to it, sorted
pub fn list_images(folder: &Path) -> Result<Vec<String>, InventoryError> {
    ensure_dir(folder)?;
    let mut images: Vec<String> = WalkDir::new(folder)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_image(e.path()))
        .filter_map(|e| {
            e.path().strip_prefix(folder).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();
    images.sort();
    debug!(folder = %folder.display(), count = images.len(), "images listed");
    Ok(images)
}

/// Read a single batch folder
pub fn inspect_batch(folder: &Path) -> Result<Batch, InventoryError> {
    ensure_dir(folder)?;
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string());
    let folder_count = child_dirs(folder)?.len() as u32;
    let image_count = list_images(folder)?.len() as u32;
    Ok(Batch::new(name, folder_count, image_count).with_path(folder))
}

/// All `BATCH*` folders directly below `root`, sorted by name
pub fn discover_batches(root: &Path) -> Result<Vec<Batch>, InventoryError> {
    ensure_dir(root)?;
    let mut batches = Vec::new();
    for entry in child_dirs(root)? {
        if !file_name(&entry).starts_with(BATCH_PREFIX) {
            continue;
        }
        batches.push(inspect_batch(entry.path())?);
    }
    debug!(root = %root.display(), count = batches.len(), "batches discovered");
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("scan.TIF")));
        assert!(is_image(Path::new("a/b/page.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("tif")));
    }

    #[test]
    fn test_list_images_is_recursive_and_sorted() {
        let tmp = tempdir().unwrap();
        let batch = tmp.path().join("BATCH_01");
        touch(&batch.join("box_2/b.jpg"));
        touch(&batch.join("box_1/a.tif"));
        touch(&batch.join("box_1/nested/c.png"));
        touch(&batch.join("box_1/readme.txt"));
        touch(&batch.join("cover.JPG"));

        let images = list_images(&batch).unwrap();
        assert_eq!(
            images,
            vec!["box_1/a.tif", "box_1/nested/c.png", "box_2/b.jpg", "cover.JPG"]
        );
    }

    #[test]
    fn test_discover_batches() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("BATCH_02/f1/1.jpg"));
        touch(&tmp.path().join("BATCH_01/f1/1.jpg"));
        touch(&tmp.path().join("BATCH_01/f2/2.jpg"));
        touch(&tmp.path().join("BATCH_01/f2/3.jpg"));
        touch(&tmp.path().join("other/4.jpg"));
        touch(&tmp.path().join("BATCH_file.jpg"));

        let batches = discover_batches(tmp.path()).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].name, "BATCH_01");
        assert_eq!(batches[0].folder_count, 2);
        assert_eq!(batches[0].image_count, 3);
        assert_eq!(batches[1].name, "BATCH_02");
        assert_eq!(batches[1].image_count, 1);
        assert!(batches[0].path.is_some());
    }

    #[test]
    fn test_subfolders() {
        let tmp = tempdir().unwrap();
        touch(&tmp.path().join("b/1.jpg"));
        touch(&tmp.path().join("a/1.jpg"));
        touch(&tmp.path().join("x.jpg"));
        assert_eq!(subfolders(tmp.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            discover_batches(&missing),
            Err(InventoryError::NotADirectory(_))
        ));
    }
}
