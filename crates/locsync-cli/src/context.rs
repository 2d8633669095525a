//! Project root detection
//!
//! Walks up from the working directory to the nearest
//! `.locsync/config.toml`, so commands work from any subdirectory.

use std::path::{Path, PathBuf};

use locsync_core::SyncConfig;
use locsync_fs::{NormalizedPath, ProjectPath};

use crate::error::Result;

/// Find the directory holding `.locsync/config.toml`, starting at `cwd`.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|dir| dir.join(ProjectPath::ConfigFile.as_str()).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the project root or fail with a hint to run `locsync init`.
pub fn require_project_root(cwd: &Path) -> Result<NormalizedPath> {
    match find_project_root(cwd) {
        Some(root) => {
            let root = NormalizedPath::canonicalize(&root)
                .map_err(|e| locsync_fs::Error::io(root.clone(), e))?;
            tracing::debug!(root = %root, "found project root");
            Ok(root)
        }
        None => Err(locsync_core::Error::ConfigNotFound {
            path: SyncConfig::path(&NormalizedPath::new(cwd)).to_native(),
        }
        .into()),
    }
}
