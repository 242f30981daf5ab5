//! Feature pruning
//!
//! Removes the base exclusions and every path owned by an unselected
//! feature from a generated tree, then deletes directories left empty.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::features::FeatureSet;

/// Paths removed by a prune run, relative to the pruned root
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

pub struct FeaturePruner<'a> {
    features: &'a FeatureSet,
}

impl<'a> FeaturePruner<'a> {
    pub fn new(features: &'a FeatureSet) -> Self {
        Self { features }
    }

    /// Prune `root`. Running it again on the same tree removes nothing.
    pub fn prune(&self, root: &Path) -> Result<PruneReport> {
        let mut report = PruneReport::default();

        for rel in self.features.excluded_paths() {
            let path = root.join(rel);

            let meta = match fs::symlink_metadata(&path) {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ScaffoldError::io(&path, e)),
            };

            if meta.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| ScaffoldError::io(&path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| ScaffoldError::io(&path, e))?;
            }

            debug!(path = rel, "pruned");
            report.removed.push(PathBuf::from(rel));
        }

        remove_empty_dirs(root, &mut report)?;

        Ok(report)
    }
}

/// Delete empty directories under `root` (not `root` itself). Children are
/// visited before their parents, so a directory emptied by removing its
/// last subdirectory is caught in the same pass.
fn remove_empty_dirs(root: &Path, report: &mut PruneReport) -> Result<()> {
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| ScaffoldError::walk(root, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let mut children = fs::read_dir(path).map_err(|e| ScaffoldError::io(path, e))?;
        if children.next().is_some() {
            continue;
        }

        fs::remove_dir(path).map_err(|e| ScaffoldError::io(path, e))?;

        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        debug!(path = %rel.display(), "removed empty directory");
        report.removed.push(rel);
    }

    Ok(())
}
