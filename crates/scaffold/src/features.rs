//! Optional plugin features
//!
//! Each feature owns a set of paths in the generated tree. Paths owned by
//! features that were not selected are pruned after instantiation.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{Result, ScaffoldError};

/// Paths removed from every generated plugin
pub const BASE_EXCLUSIONS: &[&str] = &["composer.json"];

/// Optional capabilities a plugin can be generated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Helpers,
    Config,
    Database,
    Permissions,
    Translations,
    Views,
    Routes,
    PublishingAssets,
    /// Example CRUD resource (forms, models, tables, controllers)
    Crud,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Helpers => "helpers",
            Self::Config => "config",
            Self::Database => "database",
            Self::Permissions => "permissions",
            Self::Translations => "translations",
            Self::Views => "views",
            Self::Routes => "routes",
            Self::PublishingAssets => "publishing_assets",
            Self::Crud => "crud",
        }
    }

    /// Parse a feature name; `-` and `_` are interchangeable
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "helpers" => Some(Self::Helpers),
            "config" => Some(Self::Config),
            "database" => Some(Self::Database),
            "permissions" => Some(Self::Permissions),
            "translations" => Some(Self::Translations),
            "views" => Some(Self::Views),
            "routes" => Some(Self::Routes),
            "publishing_assets" => Some(Self::PublishingAssets),
            "crud" => Some(Self::Crud),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Helpers => "Helpers",
            Self::Config => "Config",
            Self::Database => "Database",
            Self::Permissions => "Permissions",
            Self::Translations => "Translations",
            Self::Views => "Views",
            Self::Routes => "Routes",
            Self::PublishingAssets => "Publishing assets",
            Self::Crud => "Example CRUD",
        }
    }

    /// Relative paths (files or directories) this feature owns
    pub fn owned_paths(&self) -> &'static [&'static str] {
        match self {
            Self::Helpers => &["helpers"],
            Self::Config => &["config/general.php"],
            Self::Database => &["database"],
            Self::Permissions => &["config/permissions.php"],
            Self::Translations => &["resources/lang"],
            Self::Views => &["resources/views"],
            Self::Routes => &["routes"],
            Self::PublishingAssets => &["public"],
            Self::Crud => &["src/Forms", "src/Models", "src/Tables", "src/Http"],
        }
    }

    /// Features pulled in when this one is selected
    pub fn implies(&self) -> &'static [Feature] {
        match self {
            Self::Crud => &[
                Self::Permissions,
                Self::Database,
                Self::Translations,
                Self::Routes,
            ],
            _ => &[],
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Helpers,
            Self::Config,
            Self::Database,
            Self::Permissions,
            Self::Translations,
            Self::Views,
            Self::Routes,
            Self::PublishingAssets,
            Self::Crud,
        ]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The features selected for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSet {
    features: BTreeSet<Feature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse feature names, rejecting anything outside the catalog
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref();
            let feature = Feature::from_str(name)
                .ok_or_else(|| ScaffoldError::UnknownFeature(name.to_string()))?;
            set.insert(feature);
        }
        Ok(set)
    }

    /// Add a feature together with everything it implies
    pub fn insert(&mut self, feature: Feature) {
        self.features.insert(feature);
        for implied in feature.implies() {
            self.features.insert(*implied);
        }
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Paths that must not survive in the output tree: the base exclusions
    /// plus every path owned by an unselected feature
    pub fn excluded_paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<&'static str> = BASE_EXCLUSIONS.to_vec();
        for feature in Feature::all() {
            if !self.contains(*feature) {
                paths.extend_from_slice(feature.owned_paths());
            }
        }
        paths
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::new();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}
