//! Stub tree instantiation
//!
//! Copies a stub directory to a destination, rewriting placeholders in
//! every path segment and in every text file on the way. Copy, rename and
//! content rewrite happen as one operation per entry.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};
use crate::rewrite::{self, is_binary_file};
use crate::tokens::TokenSet;

/// Kind of entry created in the output tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// Paths created by an instantiation, relative to the destination root,
/// in walk order
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputTree {
    pub entries: Vec<(PathBuf, EntryKind)>,
}

impl OutputTree {
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|(_, kind)| *kind == EntryKind::File)
            .map(|(path, _)| path.as_path())
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|(_, kind)| *kind == EntryKind::Dir)
            .map(|(path, _)| path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another tree whose paths are relative to `prefix`
    pub fn merge(&mut self, prefix: &Path, other: OutputTree) {
        for (path, kind) in other.entries {
            self.entries.push((prefix.join(path), kind));
        }
    }
}

/// Copies stub trees with placeholder substitution
pub struct TreeInstantiator<'a> {
    tokens: &'a TokenSet,
}

impl<'a> TreeInstantiator<'a> {
    pub fn new(tokens: &'a TokenSet) -> Self {
        Self { tokens }
    }

    /// Rewrite each component of a relative path
    pub fn rename(&self, rel_path: &Path) -> PathBuf {
        rel_path
            .components()
            .map(|component| {
                let segment = component.as_os_str().to_string_lossy();
                rewrite::rewrite_str(&segment, self.tokens)
            })
            .collect()
    }

    /// Instantiate `stub_root` into `dest_root`, which must not exist yet
    pub fn instantiate(&self, stub_root: &Path, dest_root: &Path) -> Result<OutputTree> {
        if !stub_root.is_dir() {
            return Err(ScaffoldError::StubNotFound(stub_root.to_path_buf()));
        }
        if dest_root.exists() {
            return Err(ScaffoldError::DestinationExists(dest_root.to_path_buf()));
        }

        fs::create_dir_all(dest_root).map_err(|e| ScaffoldError::io(dest_root, e))?;

        let mut tree = OutputTree::default();

        for entry in WalkDir::new(stub_root).sort_by_file_name() {
            let entry = entry.map_err(|e| ScaffoldError::walk(stub_root, e))?;
            let src_path = entry.path();

            let Ok(rel_path) = src_path.strip_prefix(stub_root) else {
                continue;
            };

            // Skip the root directory itself
            if rel_path.as_os_str().is_empty() {
                continue;
            }

            let dest_rel = self.rename(rel_path);
            let dest_path = dest_root.join(&dest_rel);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest_path).map_err(|e| ScaffoldError::io(&dest_path, e))?;
                debug!(path = %dest_rel.display(), "created directory");
                tree.entries.push((dest_rel, EntryKind::Dir));
            } else {
                self.copy_file(src_path, &dest_path)?;
                debug!(path = %dest_rel.display(), "created file");
                tree.entries.push((dest_rel, EntryKind::File));
            }
        }

        Ok(tree)
    }

    /// Copy a single file to a fixed destination, rewriting its content
    pub fn copy_file(&self, src: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ScaffoldError::io(parent, e))?;
        }

        let content = fs::read(src).map_err(|e| ScaffoldError::io(src, e))?;

        if is_binary_file(&content) {
            // Binary file - copy as-is
            fs::write(dest, &content).map_err(|e| ScaffoldError::io(dest, e))?;
        } else {
            let rewritten = rewrite::rewrite(&content, self.tokens);
            fs::write(dest, rewritten.as_ref()).map_err(|e| ScaffoldError::io(dest, e))?;
        }

        // Preserve executable permission
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(src_meta) = src.metadata() {
                let src_mode = src_meta.permissions().mode();
                if src_mode & 0o111 != 0 {
                    let mut perms = fs::metadata(dest)
                        .map_err(|e| ScaffoldError::io(dest, e))?
                        .permissions();
                    perms.set_mode(src_mode);
                    fs::set_permissions(dest, perms).map_err(|e| ScaffoldError::io(dest, e))?;
                }
            }
        }

        Ok(())
    }
}
