//! scaffold - Plugin generation from stub trees
//!
//! "The boring parts of a plugin should take zero thought."
//!
//! Commands:
//! - new <ID>: Generate a plugin from the stub catalog
//! - tokens <ID>: Show the resolved token table without writing anything
//! - features: List optional features and the paths they own

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scaffold::config;
use scaffold::features::BASE_EXCLUSIONS;
use scaffold::tokens::validate_name;
use scaffold::{
    Feature, FeatureSet, Generator, Metadata, PluginId, PluginRequest, ScaffoldError, StubLayout,
};

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Plugin scaffolding - generate a plugin from stub templates")]
#[command(version)]
#[command(after_help = r#"FEATURES:
    helpers, config, database, permissions, translations,
    views, routes, publishing_assets, crud

    crud adds an example CRUD resource and implies
    permissions, database, translations and routes.

TOKENS:
    {module}   hello_world          {Module}   Botble\HelloWorld
    {-module}  hello-world          {MODULE}   HELLO_WORLD
    {+module}  helloWorld           {modules}  hello_worlds
    {-modules} hello-worlds         {Modules}  Hello_worlds

EXAMPLES:
    scaffold new acme/hello-world --feature views
    scaffold new acme/blog --crud --author "Jane Doe"
    scaffold tokens acme/blog --feature routes --json
    scaffold features
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new plugin
    New {
        /// Plugin ID (ex: acme/hello-world)
        id: String,

        /// Destination directory (default: ./<plugin-name>)
        #[arg(long)]
        dest: Option<PathBuf>,

        #[command(flatten)]
        metadata: MetadataArgs,

        #[command(flatten)]
        selection: FeatureArgs,

        /// Stub catalog directory
        #[arg(long)]
        stubs: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved token table
    Tokens {
        /// Plugin ID (ex: acme/hello-world)
        id: String,

        #[command(flatten)]
        metadata: MetadataArgs,

        #[command(flatten)]
        selection: FeatureArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List optional features
    Features {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct MetadataArgs {
    /// Plugin name (default: name part of the ID)
    #[arg(long)]
    name: Option<String>,

    /// Plugin description
    #[arg(long)]
    description: Option<String>,

    /// Plugin namespace (ex: Acme/HelloWorld)
    #[arg(long)]
    namespace: Option<String>,

    /// Service provider class
    #[arg(long)]
    provider: Option<String>,

    /// Plugin author
    #[arg(long)]
    author: Option<String>,

    /// Plugin author URL
    #[arg(long)]
    author_url: Option<String>,

    /// Plugin version
    #[arg(long = "plugin-version")]
    plugin_version: Option<String>,

    /// Minimum core version
    #[arg(long)]
    min_core_version: Option<String>,
}

impl From<MetadataArgs> for Metadata {
    fn from(args: MetadataArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            namespace: args.namespace,
            provider: args.provider,
            author: args.author,
            author_url: args.author_url,
            version: args.plugin_version,
            minimum_core_version: args.min_core_version,
        }
    }
}

#[derive(Args)]
struct FeatureArgs {
    /// Enable an optional feature (repeatable)
    #[arg(long = "feature", short = 'f', value_name = "FEATURE")]
    features: Vec<String>,

    /// Include the example CRUD resource
    #[arg(long)]
    crud: bool,
}

impl FeatureArgs {
    fn into_feature_set(self) -> Result<FeatureSet> {
        let mut set = FeatureSet::parse(&self.features)?;
        if self.crud {
            set.insert(Feature::Crud);
        }
        Ok(set)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New {
            id,
            dest,
            metadata,
            selection,
            stubs,
            json,
        } => cmd_new(&id, dest, metadata.into(), selection, stubs, json),

        Commands::Tokens {
            id,
            metadata,
            selection,
            json,
        } => cmd_tokens(&id, metadata.into(), selection, json),

        Commands::Features { json } => cmd_features(json),
    }
}

/// Validate the ID and build a request
fn build_request(
    id: &str,
    dest: Option<PathBuf>,
    metadata: Metadata,
    selection: FeatureArgs,
) -> Result<PluginRequest> {
    let plugin_id = PluginId::parse(id)?;
    if let Some(name) = metadata.name.as_deref() {
        validate_name(&name.trim().to_lowercase())?;
    }
    let features = selection.into_feature_set()?;

    let dest = dest.unwrap_or_else(|| {
        let name = metadata
            .name
            .as_deref()
            .map(|name| name.trim().to_lowercase())
            .unwrap_or_else(|| plugin_id.name.clone());
        PathBuf::from(name)
    });

    Ok(PluginRequest {
        identifier: plugin_id.to_string(),
        metadata,
        features,
        dest,
    })
}

/// Generate a plugin
fn cmd_new(
    id: &str,
    dest: Option<PathBuf>,
    metadata: Metadata,
    selection: FeatureArgs,
    stubs: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = config::load_config().context("Failed to load scaffold config")?;
    let request = build_request(id, dest, metadata, selection)?;

    if request.dest.exists() {
        bail!("A plugin already exists at {}", request.dest.display());
    }

    let stub_dir = config.resolve_stub_dir(stubs.as_deref());
    let generator = Generator::new(StubLayout::new(&stub_dir), config);

    if !json {
        println!("info: Creating plugin {} in {}", request.identifier, request.dest.display());
    }

    let report = match generator.generate(&request) {
        Ok(report) => report,
        Err(err @ ScaffoldError::Io { .. }) => {
            return Err(err).with_context(|| {
                format!(
                    "Generation stopped part way. Remove {} and try again",
                    request.dest.display()
                )
            });
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("success: Plugin created: {}", report.dest.display());
    println!();
    println!("\x1b[36mFiles:\x1b[0m");
    let mut files = report.files();
    files.sort();
    for file in files {
        println!("  {}", file.display());
    }

    let features: Vec<_> = request.features.iter().map(|f| f.as_str()).collect();
    println!();
    if features.is_empty() {
        println!("\x1b[2mNo optional features selected.\x1b[0m");
    } else {
        println!("\x1b[36mFeatures:\x1b[0m {}", features.join(", "));
    }

    println!();
    println!("Next steps:");
    println!("  cd {}", report.dest.display());
    println!("  review plugin.json and customize it!");

    Ok(())
}

/// Show the resolved token table
fn cmd_tokens(id: &str, metadata: Metadata, selection: FeatureArgs, json: bool) -> Result<()> {
    let config = config::load_config().context("Failed to load scaffold config")?;
    let request = build_request(id, None, metadata, selection)?;

    let stub_dir = config.resolve_stub_dir(None);
    let generator = Generator::new(StubLayout::new(&stub_dir), config);
    let tokens = generator.preview(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!("\x1b[1mTokens: {}\x1b[0m", request.identifier);
    println!();

    let width = tokens.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in tokens.iter() {
        if value.contains('\n') {
            println!("  \x1b[32m{:width$}\x1b[0m", key, width = width);
            for line in value.lines() {
                println!("      \x1b[2m{}\x1b[0m", line);
            }
        } else {
            println!("  \x1b[32m{:width$}\x1b[0m  {}", key, value, width = width);
        }
    }

    Ok(())
}

/// List the feature catalog
fn cmd_features(json: bool) -> Result<()> {
    if json {
        let json_output: Vec<_> = Feature::all()
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.as_str(),
                    "label": f.label(),
                    "paths": f.owned_paths(),
                    "implies": f.implies().iter().map(|i| i.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_output)?);
        return Ok(());
    }

    println!("\x1b[1mAvailable Features\x1b[0m");
    println!();

    for feature in Feature::all() {
        println!("  \x1b[32m{}\x1b[0m  {}", feature.as_str(), feature.label());
        println!("    \x1b[2mowns: {}\x1b[0m", feature.owned_paths().join(", "));
        if !feature.implies().is_empty() {
            let implied: Vec<_> = feature.implies().iter().map(|f| f.as_str()).collect();
            println!("    \x1b[2mimplies: {}\x1b[0m", implied.join(", "));
        }
    }

    println!();
    println!("\x1b[2mAlways removed: {}\x1b[0m", BASE_EXCLUSIONS.join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_new_command_args() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "new",
            "acme/blog",
            "--feature",
            "routes",
            "-f",
            "views",
            "--crud",
            "--plugin-version",
            "2.0.0",
        ])
        .unwrap();

        match cli.command {
            Commands::New {
                id,
                metadata,
                selection,
                ..
            } => {
                assert_eq!(id, "acme/blog");
                assert_eq!(metadata.plugin_version.as_deref(), Some("2.0.0"));
                let set = selection.into_feature_set().unwrap();
                assert!(set.contains(Feature::Routes));
                assert!(set.contains(Feature::Views));
                assert!(set.contains(Feature::Database));
            }
            _ => panic!("expected new command"),
        }
    }

    #[test]
    fn test_build_request_defaults_dest_to_name() {
        let selection = FeatureArgs {
            features: vec![],
            crud: false,
        };
        let request = build_request("Acme/Hello-World", None, Metadata::default(), selection).unwrap();
        assert_eq!(request.identifier, "acme/hello-world");
        assert_eq!(request.dest, PathBuf::from("hello-world"));
    }

    #[test]
    fn test_build_request_rejects_path_like_name() {
        let selection = FeatureArgs {
            features: vec![],
            crud: false,
        };
        let metadata = Metadata {
            name: Some("../escaped".to_string()),
            ..Default::default()
        };
        let err = build_request("acme/blog", None, metadata, selection).unwrap_err();
        assert!(err.to_string().contains("../escaped"));
    }

    #[test]
    fn test_build_request_rejects_unknown_feature() {
        let selection = FeatureArgs {
            features: vec!["graphql".to_string()],
            crud: false,
        };
        let err = build_request("acme/blog", None, Metadata::default(), selection).unwrap_err();
        assert!(err.to_string().contains("graphql"));
    }
}
