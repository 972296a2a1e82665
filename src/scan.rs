//! Image discovery

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A candidate image found under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Recursively collect image files under `root`
///
/// Files are kept when their extension matches `config.image_extensions`
/// case-insensitively. Symlinks to files are kept; symlinked directories are
/// not followed. The result is sorted by full path, byte-wise, so the
/// same tree always yields the same order.
pub fn scan_images(root: &Path, config: &Config) -> Result<Vec<ImageFile>> {
    if !root.is_dir() {
        return Err(Error::SourceNotDirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    // Links to directories are not descended into; links to files count as files
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let file_type = entry.file_type();
        if (file_type.is_file() || (file_type.is_symlink() && path.is_file()))
            && let Some(ext) = path.extension().and_then(|e| e.to_str())
            && config.is_image(ext)
        {
            files.push(ImageFile {
                path: path.to_path_buf(),
            });
        }
    }

    files.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));

    debug!(root = ?root, count = files.len(), "Scanned source directory");
    Ok(files)
}
