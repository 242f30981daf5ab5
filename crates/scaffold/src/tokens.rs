//! Token table derivation
//!
//! A single plugin identifier (`vendor/name` or just `name`) plus optional
//! metadata is expanded into the full table of `{placeholder} -> value`
//! pairs used for path and content rewriting. Resolution is pure: the same
//! inputs always give the same table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::case;
use crate::config::ScaffoldConfig;
use crate::error::{Result, ScaffoldError};
use crate::rewrite;

/// A validated `vendor/name` plugin identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginId {
    pub vendor: Option<String>,
    pub name: String,
}

impl PluginId {
    /// Validate an identifier: `[a-zA-Z0-9-_.]` with at most one `/`
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScaffoldError::InvalidIdentifier(
                "identifier is empty".to_string(),
            ));
        }

        let (vendor, name) = match raw.split_once('/') {
            Some((vendor, name)) => (Some(vendor), name),
            None => (None, raw),
        };

        if !is_valid_segment(name) || vendor.is_some_and(|v| !is_valid_segment(v)) {
            return Err(ScaffoldError::InvalidIdentifier(format!(
                "{} (expected <vendor>/<name> using letters, digits, '-', '_' or '.')",
                raw
            )));
        }

        Ok(Self {
            vendor: vendor.map(str::to_lowercase),
            name: name.to_lowercase(),
        })
    }
}

/// `[a-zA-Z0-9-_.]`, non-empty, and not `.` or `..`
fn is_valid_segment(part: &str) -> bool {
    !part.is_empty()
        && part != "."
        && part != ".."
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Check a plugin name before it is used as a path segment
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_segment(name) {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidIdentifier(format!(
            "plugin name {:?} (use letters, digits, '-', '_' or '.')",
            name
        )))
    }
}

impl std::fmt::Display for PluginId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.vendor {
            Some(vendor) => write!(f, "{}/{}", vendor, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Metadata fields that fall back to a default template
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Name,
    Description,
    Namespace,
    Provider,
    Author,
    AuthorUrl,
    Version,
    MinimumCoreVersion,
}

impl MetadataField {
    /// Order in which defaults are resolved. A field only ever appears
    /// after every field it depends on.
    pub const RESOLUTION_ORDER: [MetadataField; 8] = [
        Self::Name,
        Self::Namespace,
        Self::Provider,
        Self::Description,
        Self::Author,
        Self::AuthorUrl,
        Self::Version,
        Self::MinimumCoreVersion,
    ];

    /// Fields whose resolved value this field's default may reference
    pub fn depends_on(&self) -> &'static [MetadataField] {
        match self {
            Self::Name | Self::Namespace => &[],
            Self::Provider => &[Self::Namespace],
            Self::Description
            | Self::Author
            | Self::AuthorUrl
            | Self::Version
            | Self::MinimumCoreVersion => &[Self::Namespace, Self::Provider],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Namespace => "namespace",
            Self::Provider => "provider",
            Self::Author => "author",
            Self::AuthorUrl => "author_url",
            Self::Version => "version",
            Self::MinimumCoreVersion => "minimum_core_version",
        }
    }

    /// Placeholder that exposes this field's resolved value to later defaults
    fn default_placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Namespace => Some("{Namespace}"),
            Self::Provider => Some("{Provider}"),
            _ => None,
        }
    }
}

/// Caller-supplied metadata. `None` means "use the default template".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub namespace: Option<String>,
    pub provider: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub version: Option<String>,
    pub minimum_core_version: Option<String>,
}

impl Metadata {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let value = match field {
            MetadataField::Name => &self.name,
            MetadataField::Description => &self.description,
            MetadataField::Namespace => &self.namespace,
            MetadataField::Provider => &self.provider,
            MetadataField::Author => &self.author,
            MetadataField::AuthorUrl => &self.author_url,
            MetadataField::Version => &self.version,
            MetadataField::MinimumCoreVersion => &self.minimum_core_version,
        };
        value.as_deref().map(str::trim)
    }

    /// Fill every field, resolving defaults in [`MetadataField::RESOLUTION_ORDER`]
    pub fn resolve(
        &self,
        name_part: &str,
        config: &ScaffoldConfig,
    ) -> BTreeMap<MetadataField, String> {
        let mut context = TokenSet::new();
        context.insert("{plugin-name}", case::kebab(name_part));
        context.insert("{PluginName}", case::pascal(name_part));
        context.insert("{Vendor}", config.vendor.clone());

        let mut resolved = BTreeMap::new();
        for field in MetadataField::RESOLUTION_ORDER {
            let value = match self.get(field) {
                Some(value) => value.to_string(),
                None => rewrite::rewrite_str(&config.default_template(field), &context),
            };

            if field == MetadataField::Name {
                // Class-name defaults follow the resolved name, not the ID
                context.insert("{PluginName}", case::pascal(&case::lower(&value)));
            }
            if let Some(key) = field.default_placeholder() {
                context.insert(key, value.clone());
            }
            resolved.insert(field, value);
        }

        resolved
    }
}

/// `/`-separated class path to a `\`-separated one
fn class_path(value: &str) -> String {
    value.replace('/', "\\")
}

/// Escape a value for use inside a JSON string literal
fn json_escape(value: &str) -> String {
    let quoted = serde_json::Value::from(value).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Class path escaped for a JSON string
fn json_class_path(value: &str) -> String {
    json_escape(&class_path(value))
}

/// Placeholder -> value table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSet {
    tokens: BTreeMap<String, String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the full token table for a plugin.
    ///
    /// The name part is the segment after the last `/` of `identifier`,
    /// unless `metadata.name` overrides it. Fails with
    /// [`ScaffoldError::InvalidIdentifier`] when nothing is left after
    /// trimming.
    pub fn resolve(identifier: &str, metadata: &Metadata, config: &ScaffoldConfig) -> Result<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ScaffoldError::InvalidIdentifier(
                "identifier is empty".to_string(),
            ));
        }

        let id_name = identifier.rsplit('/').next().unwrap_or(identifier);
        if id_name.is_empty() {
            return Err(ScaffoldError::InvalidIdentifier(format!(
                "{} has no name after the vendor",
                identifier
            )));
        }

        let meta = metadata.resolve(id_name, config);
        let field = |f: MetadataField| meta.get(&f).cloned().unwrap_or_default();

        let name = case::lower(&field(MetadataField::Name));
        validate_name(&name)?;

        let snake = case::snake(&name);
        let namespace = field(MetadataField::Namespace);

        let mut tokens = Self::new();
        tokens.insert("{type}", "plugin");
        tokens.insert("{types}", "plugins");
        tokens.insert("{-module}", name.clone());
        tokens.insert("{module}", snake.clone());
        tokens.insert("{+module}", case::camel(&name));
        tokens.insert("{modules}", case::pluralize(&snake));
        tokens.insert("{Modules}", case::ucfirst(&case::pluralize(&snake)));
        tokens.insert("{-modules}", case::pluralize(&name));
        tokens.insert("{MODULE}", case::upper_snake(&name));
        tokens.insert("{Module}", class_path(&namespace));
        tokens.insert("{ModuleClass}", case::pascal(&name));

        tokens.insert("{PluginId}", identifier.to_lowercase());
        tokens.insert(
            "{PluginName}",
            json_escape(&case::ucfirst(&name.replace('-', " "))),
        );
        tokens.insert("{PluginNamespace}", format!("{}\\\\", json_class_path(&namespace)));
        tokens.insert(
            "{PluginServiceProvider}",
            json_class_path(&field(MetadataField::Provider)),
        );

        // Manifest values land inside JSON string literals
        for (key, source) in [
            ("{PluginAuthor}", MetadataField::Author),
            ("{PluginAuthorURL}", MetadataField::AuthorUrl),
            ("{PluginVersion}", MetadataField::Version),
            ("{PluginDescription}", MetadataField::Description),
            ("{PluginMinimumCoreVersion}", MetadataField::MinimumCoreVersion),
        ] {
            tokens.insert(key, json_escape(&field(source)));
        }

        Ok(tokens)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tokens.insert(key.into(), value.into());
    }

    /// Add every entry of `other`, replacing existing keys
    pub fn extend(&mut self, other: TokenSet) {
        self.tokens.extend(other.tokens);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// Entries in placeholder order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tokens = Self::new();
        for (key, value) in iter {
            tokens.insert(key, value);
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(id: &str) -> TokenSet {
        TokenSet::resolve(id, &Metadata::default(), &ScaffoldConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_is_pure() {
        assert_eq!(resolve("acme/hello-world"), resolve("acme/hello-world"));
    }

    #[test]
    fn test_hyphen_and_underscore_derive_same_variants() {
        let hyphen = resolve("my-thing");
        let underscore = resolve("my_thing");
        for key in ["{module}", "{+module}", "{modules}", "{Modules}", "{MODULE}", "{ModuleClass}"] {
            assert_eq!(hyphen.get(key), underscore.get(key), "{}", key);
        }
    }

    #[test]
    fn test_derived_variants() {
        let tokens = resolve("acme/hello-world");
        assert_eq!(tokens.get("{type}"), Some("plugin"));
        assert_eq!(tokens.get("{-module}"), Some("hello-world"));
        assert_eq!(tokens.get("{module}"), Some("hello_world"));
        assert_eq!(tokens.get("{+module}"), Some("helloWorld"));
        assert_eq!(tokens.get("{modules}"), Some("hello_worlds"));
        assert_eq!(tokens.get("{Modules}"), Some("Hello_worlds"));
        assert_eq!(tokens.get("{-modules}"), Some("hello-worlds"));
        assert_eq!(tokens.get("{MODULE}"), Some("HELLO_WORLD"));
        assert_eq!(tokens.get("{ModuleClass}"), Some("HelloWorld"));
        assert_eq!(tokens.get("{PluginId}"), Some("acme/hello-world"));
        assert_eq!(tokens.get("{PluginName}"), Some("Hello world"));
    }

    #[test]
    fn test_namespace_and_provider_defaults() {
        let tokens = resolve("acme/hello-world");
        assert_eq!(tokens.get("{Module}"), Some("Botble\\HelloWorld"));
        assert_eq!(tokens.get("{PluginNamespace}"), Some("Botble\\\\HelloWorld\\\\"));
        assert_eq!(
            tokens.get("{PluginServiceProvider}"),
            Some("Botble\\\\HelloWorld\\\\Providers\\\\HelloWorldServiceProvider")
        );
        assert_eq!(tokens.get("{PluginVersion}"), Some("1.0.0"));
        assert_eq!(tokens.get("{PluginMinimumCoreVersion}"), Some("7.3.0"));
        assert_eq!(tokens.get("{PluginAuthor}"), Some(""));
    }

    #[test]
    fn test_provider_default_follows_custom_namespace() {
        let metadata = Metadata {
            namespace: Some("Acme/Greeter".to_string()),
            ..Default::default()
        };
        let tokens =
            TokenSet::resolve("acme/hello-world", &metadata, &ScaffoldConfig::default()).unwrap();
        assert_eq!(tokens.get("{Module}"), Some("Acme\\Greeter"));
        assert_eq!(
            tokens.get("{PluginServiceProvider}"),
            Some("Acme\\\\Greeter\\\\Providers\\\\HelloWorldServiceProvider")
        );
    }

    #[test]
    fn test_vendor_prefix_is_configurable() {
        let config = ScaffoldConfig {
            vendor: "Acme".to_string(),
            ..Default::default()
        };
        let tokens = TokenSet::resolve("blog", &Metadata::default(), &config).unwrap();
        assert_eq!(tokens.get("{Module}"), Some("Acme\\Blog"));
        assert_eq!(
            tokens.get("{PluginDescription}"),
            Some("This is a Acme plugin generated by scaffold")
        );
    }

    #[test]
    fn test_explicit_name_overrides_identifier() {
        let metadata = Metadata {
            name: Some("Blog-Post".to_string()),
            ..Default::default()
        };
        let tokens =
            TokenSet::resolve("acme/something", &metadata, &ScaffoldConfig::default()).unwrap();
        assert_eq!(tokens.get("{-module}"), Some("blog-post"));
        assert_eq!(tokens.get("{modules}"), Some("blog_posts"));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        for id in ["", "   ", "acme/"] {
            let err = TokenSet::resolve(id, &Metadata::default(), &ScaffoldConfig::default())
                .unwrap_err();
            assert!(matches!(err, ScaffoldError::InvalidIdentifier(_)), "{:?}", id);
        }
    }

    #[test]
    fn test_resolution_order_is_topological() {
        let order = MetadataField::RESOLUTION_ORDER;
        for (idx, field) in order.iter().enumerate() {
            for dep in field.depends_on() {
                let dep_idx = order.iter().position(|f| f == dep).unwrap();
                assert!(dep_idx < idx, "{:?} resolved before {:?}", field, dep);
            }
        }
    }

    #[test]
    fn test_plugin_id_parse() {
        let id = PluginId::parse("Acme/Hello-World").unwrap();
        assert_eq!(id.vendor.as_deref(), Some("acme"));
        assert_eq!(id.name, "hello-world");
        assert_eq!(id.to_string(), "acme/hello-world");

        assert!(PluginId::parse("blog").is_ok());
        assert!(PluginId::parse("").is_err());
        assert!(PluginId::parse("acme/").is_err());
        assert!(PluginId::parse("a/b/c").is_err());
        assert!(PluginId::parse("acme/hello world").is_err());
        assert!(PluginId::parse("acme/..").is_err());
        assert!(PluginId::parse("./blog").is_err());
    }

    #[test]
    fn test_name_with_path_parts_rejected() {
        for name in ["../../escaped", "a/b", "..", ".", "hello world", "a\\b"] {
            let metadata = Metadata {
                name: Some(name.to_string()),
                ..Default::default()
            };
            let err = TokenSet::resolve("acme/blog", &metadata, &ScaffoldConfig::default())
                .unwrap_err();
            assert!(matches!(err, ScaffoldError::InvalidIdentifier(_)), "{:?}", name);
        }
    }

    #[test]
    fn test_name_override_drives_class_defaults() {
        let metadata = Metadata {
            name: Some("blog-post".to_string()),
            ..Default::default()
        };
        let tokens =
            TokenSet::resolve("acme/something", &metadata, &ScaffoldConfig::default()).unwrap();
        assert_eq!(tokens.get("{ModuleClass}"), Some("BlogPost"));
        assert_eq!(tokens.get("{Module}"), Some("Botble\\BlogPost"));
        assert_eq!(
            tokens.get("{PluginServiceProvider}"),
            Some("Botble\\\\BlogPost\\\\Providers\\\\BlogPostServiceProvider")
        );
    }

    #[test]
    fn test_manifest_values_are_json_escaped() {
        let metadata = Metadata {
            description: Some("The \"best\" plugin".to_string()),
            author: Some("C:\\me".to_string()),
            ..Default::default()
        };
        let tokens = TokenSet::resolve("blog", &metadata, &ScaffoldConfig::default()).unwrap();
        assert_eq!(tokens.get("{PluginDescription}"), Some("The \\\"best\\\" plugin"));
        assert_eq!(tokens.get("{PluginAuthor}"), Some("C:\\\\me"));
    }
}
