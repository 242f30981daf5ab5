//! Scaffold configuration
//!
//! Holds the vendor prefix, the default minimum host version, an optional
//! stub catalog location, and per-field overrides for the metadata
//! default templates. Loaded from `~/.config/scaffold/config.json`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};
use crate::tokens::MetadataField;

/// Environment variable that points at an alternative stub catalog
pub const STUB_DIR_ENV: &str = "SCAFFOLD_STUB_DIR";

/// Scaffold configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Vendor prefix used by namespace defaults
    pub vendor: String,

    /// Default minimum core version written into the manifest
    pub core_version: String,

    /// Stub catalog override
    pub stub_dir: Option<PathBuf>,

    /// Default-template overrides, keyed by metadata field
    pub defaults: BTreeMap<MetadataField, String>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            vendor: "Botble".to_string(),
            core_version: "7.3.0".to_string(),
            stub_dir: None,
            defaults: BTreeMap::new(),
        }
    }
}

impl ScaffoldConfig {
    /// Default template for a metadata field.
    ///
    /// Templates may reference `{plugin-name}`, `{PluginName}`, `{Vendor}`
    /// and `{Namespace}`; see [`crate::tokens::TokenSet::resolve`].
    pub fn default_template(&self, field: MetadataField) -> String {
        if let Some(template) = self.defaults.get(&field) {
            return template.clone();
        }

        match field {
            MetadataField::Name => "{plugin-name}".to_string(),
            MetadataField::Description => {
                "This is a {Vendor} plugin generated by scaffold".to_string()
            }
            MetadataField::Namespace => "{Vendor}/{PluginName}".to_string(),
            MetadataField::Provider => {
                "{Namespace}/Providers/{PluginName}ServiceProvider".to_string()
            }
            MetadataField::Author | MetadataField::AuthorUrl => String::new(),
            MetadataField::Version => "1.0.0".to_string(),
            MetadataField::MinimumCoreVersion => self.core_version.clone(),
        }
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;

        serde_json::from_str(&content).map_err(|e| {
            ScaffoldError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Pick the stub catalog: explicit flag, environment, config, bundled stubs
    pub fn resolve_stub_dir(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }

        if let Ok(dir) = std::env::var(STUB_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }

        self.stub_dir.clone().unwrap_or_else(bundled_stub_dir)
    }
}

/// Stubs shipped with the crate
pub fn bundled_stub_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("stubs")
}

/// Get the config directory path
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("scaffold")
}

/// Get the config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Load the user config
pub fn load_config() -> Result<ScaffoldConfig> {
    ScaffoldConfig::load_from(&get_config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ScaffoldConfig::load_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config.vendor, "Botble");
        assert_eq!(config.default_template(MetadataField::Version), "1.0.0");
        assert_eq!(config.default_template(MetadataField::MinimumCoreVersion), "7.3.0");
    }

    #[test]
    fn test_partial_file_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"vendor": "Acme", "defaults": {"author": "Jane Doe", "version": "0.1.0"}}"#,
        )
        .unwrap();

        let config = ScaffoldConfig::load_from(&path).unwrap();
        assert_eq!(config.vendor, "Acme");
        assert_eq!(config.core_version, "7.3.0");
        assert_eq!(config.default_template(MetadataField::Author), "Jane Doe");
        assert_eq!(config.default_template(MetadataField::Version), "0.1.0");
        assert_eq!(
            config.default_template(MetadataField::Namespace),
            "{Vendor}/{PluginName}"
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ScaffoldConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ScaffoldError::Config(_)));
    }

    #[test]
    fn test_explicit_stub_dir_wins() {
        let config = ScaffoldConfig {
            stub_dir: Some(PathBuf::from("/from/config")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_stub_dir(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
    }

    #[test]
    fn test_bundled_stubs_present() {
        assert!(bundled_stub_dir().join("module").is_dir());
    }
}
