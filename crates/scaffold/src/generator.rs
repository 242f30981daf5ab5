//! Plugin generation
//!
//! Ties the pieces together for one run: resolve tokens, validate the
//! request, assemble snippets, instantiate the stub tree, lay down the
//! fixed-name files, and prune unselected features.
//!
//! Every validation error is raised before the destination is created.
//! After that, an IO failure aborts the run and leaves whatever was
//! already written; the caller decides what to do with the partial tree.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ScaffoldConfig;
use crate::error::{Result, ScaffoldError};
use crate::features::FeatureSet;
use crate::instantiate::{EntryKind, OutputTree, TreeInstantiator};
use crate::prune::{FeaturePruner, PruneReport};
use crate::snippets::{self, SnippetContext};
use crate::tokens::{Metadata, TokenSet};

/// Destination of the copied manifest, relative to the plugin root
pub const MANIFEST_DEST: &str = "plugin.json";

/// Destination of the plugin class, relative to the plugin root
pub const PLUGIN_CLASS_DEST: &str = "src/Plugin.php";

/// Directory replaced by the provider overlay, relative to the plugin root
pub const PROVIDERS_DIR: &str = "src/Providers";

/// Location of the stub catalog pieces
#[derive(Debug, Clone)]
pub struct StubLayout {
    /// Recursively templated subtree
    pub module: PathBuf,
    /// Plugin manifest, copied to `plugin.json`
    pub manifest: PathBuf,
    /// Root plugin class, copied to `src/Plugin.php`
    pub plugin_class: PathBuf,
    /// Replaces `src/Providers` in the instantiated tree
    pub providers: PathBuf,
}

impl StubLayout {
    pub fn new(root: &Path) -> Self {
        let plugin = root.join("plugin");
        Self {
            module: root.join("module"),
            manifest: plugin.join("plugin.json"),
            plugin_class: plugin.join("Plugin.stub"),
            providers: plugin.join("src").join("Providers"),
        }
    }

    /// Check that the required pieces exist
    pub fn validate(&self) -> Result<()> {
        if !self.module.is_dir() {
            return Err(ScaffoldError::StubNotFound(self.module.clone()));
        }
        for file in [&self.manifest, &self.plugin_class] {
            if !file.is_file() {
                return Err(ScaffoldError::StubNotFound(file.clone()));
            }
        }
        Ok(())
    }
}

/// One generation request
#[derive(Debug, Clone)]
pub struct PluginRequest {
    pub identifier: String,
    pub metadata: Metadata,
    pub features: FeatureSet,
    pub dest: PathBuf,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub dest: PathBuf,
    pub created: OutputTree,
    pub pruned: PruneReport,
}

impl GenerationReport {
    /// Files still present after pruning, relative to `dest`
    pub fn files(&self) -> Vec<&Path> {
        self.created
            .files()
            .filter(|path| self.dest.join(path).is_file())
            .collect()
    }
}

pub struct Generator {
    layout: StubLayout,
    config: ScaffoldConfig,
}

impl Generator {
    pub fn new(layout: StubLayout, config: ScaffoldConfig) -> Self {
        Self { layout, config }
    }

    /// Full token table for a request, snippets included
    pub fn preview(&self, request: &PluginRequest) -> Result<TokenSet> {
        let mut tokens = TokenSet::resolve(&request.identifier, &request.metadata, &self.config)?;
        let ctx = SnippetContext::from_tokens(&tokens);
        tokens.extend(snippets::assemble(&request.features, &ctx));
        Ok(tokens)
    }

    pub fn generate(&self, request: &PluginRequest) -> Result<GenerationReport> {
        let tokens = self.preview(request)?;

        if request.dest.exists() {
            return Err(ScaffoldError::DestinationExists(request.dest.clone()));
        }
        self.layout.validate()?;

        let dest = request.dest.as_path();
        let instantiator = TreeInstantiator::new(&tokens);

        info!(dest = %dest.display(), "instantiating stubs");
        let mut created = instantiator.instantiate(&self.layout.module, dest)?;

        if self.layout.providers.is_dir() {
            let providers = dest.join(PROVIDERS_DIR);
            if providers.exists() {
                fs::remove_dir_all(&providers).map_err(|e| ScaffoldError::io(&providers, e))?;
            }
            created
                .entries
                .retain(|(path, _)| !path.starts_with(PROVIDERS_DIR));

            let overlay = instantiator.instantiate(&self.layout.providers, &providers)?;
            created
                .entries
                .push((PathBuf::from(PROVIDERS_DIR), EntryKind::Dir));
            created.merge(Path::new(PROVIDERS_DIR), overlay);
        }

        for (src, rel) in [
            (&self.layout.manifest, MANIFEST_DEST),
            (&self.layout.plugin_class, PLUGIN_CLASS_DEST),
        ] {
            instantiator.copy_file(src, &dest.join(rel))?;
            created.entries.push((PathBuf::from(rel), EntryKind::File));
        }

        info!(features = request.features.iter().count(), "pruning unselected features");
        let pruned = FeaturePruner::new(&request.features).prune(dest)?;

        Ok(GenerationReport {
            dest: dest.to_path_buf(),
            created,
            pruned,
        })
    }
}
