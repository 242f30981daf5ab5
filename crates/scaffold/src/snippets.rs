//! Feature-conditioned code snippets
//!
//! Some stub files need small fragments of code that depend on which
//! features were selected (service provider boot chain, imports, menu
//! registration, uninstall hook). Each fragment is produced by one
//! [`Snippet`] builder and exposed as an ordinary token, so the rewriter
//! never has to know about features.

use crate::features::{Feature, FeatureSet};
use crate::tokens::TokenSet;

/// Values from the token table that snippets interpolate
#[derive(Debug, Clone)]
pub struct SnippetContext {
    /// Namespace-qualified root (`Botble\HelloWorld`)
    pub namespace: String,
    /// Model class name (`HelloWorld`)
    pub class: String,
    /// Lowercase plugin name (`hello-world`)
    pub name: String,
    /// Table name (`hello_worlds`)
    pub table: String,
}

impl SnippetContext {
    pub fn from_tokens(tokens: &TokenSet) -> Self {
        let get = |key: &str| tokens.get(key).unwrap_or_default().to_string();
        Self {
            namespace: get("{Module}"),
            class: get("{ModuleClass}"),
            name: get("{-module}"),
            table: get("{modules}"),
        }
    }
}

/// One snippet token and its builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snippet {
    /// Chained loader calls in the provider's `boot()`
    BootProvider,
    /// `use` statements the provider needs
    ServiceProviderImports,
    /// Advanced-language module registration
    RegisterLanguage,
    /// Admin dashboard menu entry
    RegisterDashboardMenu,
    /// Table drops in `Plugin::remove()`
    HandleMethodRemove,
}

impl Snippet {
    pub fn all() -> &'static [Self] {
        &[
            Self::BootProvider,
            Self::ServiceProviderImports,
            Self::RegisterLanguage,
            Self::RegisterDashboardMenu,
            Self::HandleMethodRemove,
        ]
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::BootProvider => "{PluginBootProvider}",
            Self::ServiceProviderImports => "{PluginServiceProviderImports}",
            Self::RegisterLanguage => "{PluginRegisterLanguage}",
            Self::RegisterDashboardMenu => "{PluginRegisterDashboardMenu}",
            Self::HandleMethodRemove => "{PluginHandleMethodRemove}",
        }
    }

    /// Value used when no selected feature needs the fragment
    pub fn neutral(&self) -> &'static str {
        match self {
            Self::BootProvider => ";",
            Self::HandleMethodRemove => "//",
            Self::ServiceProviderImports | Self::RegisterLanguage | Self::RegisterDashboardMenu => {
                ""
            }
        }
    }

    pub fn build(&self, features: &FeatureSet, ctx: &SnippetContext) -> String {
        let fragment = match self {
            Self::BootProvider => boot_provider(features),
            Self::ServiceProviderImports => service_provider_imports(features, ctx),
            Self::RegisterLanguage => register_language(features, ctx),
            Self::RegisterDashboardMenu => register_dashboard_menu(features, ctx),
            Self::HandleMethodRemove => handle_method_remove(features, ctx),
        };
        fragment.unwrap_or_else(|| self.neutral().to_string())
    }
}

/// Build every snippet token for a feature set
pub fn assemble(features: &FeatureSet, ctx: &SnippetContext) -> TokenSet {
    Snippet::all()
        .iter()
        .map(|snippet| (snippet.placeholder(), snippet.build(features, ctx)))
        .collect()
}

fn pad(width: usize) -> String {
    " ".repeat(width)
}

/// Join `(indent, text)` pairs into newline-separated lines
fn block(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(indent, text)| format!("{}{}", pad(*indent), text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn boot_provider(features: &FeatureSet) -> Option<String> {
    let mut calls = Vec::new();

    if features.contains(Feature::Helpers) {
        calls.push("loadHelpers()");
    }
    if features.contains(Feature::Permissions) {
        calls.push("loadAndPublishConfigurations(['permissions'])");
    }
    if features.contains(Feature::Translations) {
        calls.push("loadAndPublishTranslations()");
    }
    if features.contains(Feature::Routes) {
        calls.push("loadRoutes()");
    }
    if features.contains(Feature::Views) || features.contains(Feature::PublishingAssets) {
        calls.push("loadAndPublishViews()");
    }
    if features.contains(Feature::Database) {
        calls.push("loadMigrations()");
    }

    if calls.is_empty() {
        return None;
    }

    let separator = format!("\n{}->", pad(12));
    Some(format!("->{};", calls.join(&separator)))
}

fn service_provider_imports(features: &FeatureSet, ctx: &SnippetContext) -> Option<String> {
    if !features.contains(Feature::Crud) {
        return None;
    }

    Some(format!(
        "use Botble\\Base\\Facades\\DashboardMenu;\nuse {}\\Models\\{};\n",
        ctx.namespace, ctx.class
    ))
}

fn register_language(features: &FeatureSet, ctx: &SnippetContext) -> Option<String> {
    if !features.contains(Feature::Crud) {
        return None;
    }

    let body = block(&[
        (
            12,
            "if (defined('LANGUAGE_ADVANCED_MODULE_SCREEN_NAME')) {".to_string(),
        ),
        (
            16,
            format!(
                "\\Botble\\LanguageAdvanced\\Supports\\LanguageAdvancedManager::registerModule({}::class, [",
                ctx.class
            ),
        ),
        (20, "'name',".to_string()),
        (16, "]);".to_string()),
        (12, "}".to_string()),
    ]);
    Some(format!("\n{}", body))
}

fn register_dashboard_menu(features: &FeatureSet, ctx: &SnippetContext) -> Option<String> {
    if !features.contains(Feature::Crud) {
        return None;
    }

    let name = &ctx.name;
    let body = block(&[
        (
            12,
            "DashboardMenu::default()->beforeRetrieving(function () {".to_string(),
        ),
        (16, "DashboardMenu::registerItem([".to_string()),
        (20, format!("'id' => 'cms-plugins-{}',", name)),
        (20, "'priority' => 5,".to_string()),
        (20, "'parent_id' => null,".to_string()),
        (20, format!("'name' => 'plugins/{}::{}.name',", name, name)),
        (20, "'icon' => 'fa fa-list',".to_string()),
        (20, format!("'url' => route('{}.index'),", name)),
        (20, format!("'permissions' => ['{}.index'],", name)),
        (16, "]);".to_string()),
        (12, "});".to_string()),
    ]);
    Some(format!("\n{}", body))
}

fn handle_method_remove(features: &FeatureSet, ctx: &SnippetContext) -> Option<String> {
    if !features.contains(Feature::Database) {
        return None;
    }

    Some(format!(
        "Schema::dropIfExists('{table}');\n{pad}Schema::dropIfExists('{table}_translations');",
        table = ctx.table,
        pad = pad(8)
    ))
}
