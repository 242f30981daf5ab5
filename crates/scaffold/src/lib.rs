//! scaffold - Plugin generation from stub trees
//!
//! "The boring parts of a plugin should take zero thought."
//!
//! A new plugin is a stub directory instantiated against one identifier.
//! The identifier is expanded into a table of naming tokens (`{module}`,
//! `{Module}`, `{MODULE}`, `{-modules}`, ...). Those tokens rename paths and
//! rewrite file contents in a single copy pass. Paths belonging to features
//! the caller did not ask for are pruned afterwards.
//!
//! Stubs are plain files with flat `{token}` placeholders. There are no
//! loops, conditionals, or expressions: anything that depends on the
//! selected features is assembled up front as a snippet token.

pub mod case;
pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod instantiate;
pub mod prune;
pub mod rewrite;
pub mod snippets;
pub mod tokens;

pub use config::ScaffoldConfig;
pub use error::{Result, ScaffoldError};
pub use features::{Feature, FeatureSet};
pub use generator::{GenerationReport, Generator, PluginRequest, StubLayout};
pub use instantiate::{OutputTree, TreeInstantiator};
pub use prune::{FeaturePruner, PruneReport};
pub use tokens::{Metadata, MetadataField, PluginId, TokenSet};
