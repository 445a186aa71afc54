//! CLI Tooling
//!
//! Command-line interface over [`LoaderService`]. Each invocation builds one
//! service from layered configuration, runs one command and renders the result
//! as a table or JSON.

use crate::artifact::{ArtifactCoordinate, ResolvedArtifact};
use crate::config::{ConfigLoader, LoadtreeConfig};
use crate::error::ApiError;
use crate::request::{ContextRequest, Script};
use crate::service::{ContextSummary, LoaderService, ScriptOutcome};
use crate::store::metadata::ArtifactMetadata;
use crate::store::PayloadSource;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Loadtree CLI - isolated loading contexts over Maven repositories
#[derive(Parser)]
#[command(name = "loadtree")]
#[command(about = "Resolve Maven artifacts into isolated, hierarchical loading contexts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local artifact store root
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Resolve only from the local store
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load layered configuration and fold the global flags into it.
    pub fn load_config(&self) -> Result<LoadtreeConfig, ApiError> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };

        if let Some(store) = &self.store {
            config.store.root = store.clone();
        }
        if self.offline {
            config.session.offline = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a script of create/remove operations in order
    Apply {
        /// Script file (json, yaml or toml)
        script: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a context request's dependencies into the local store
    Resolve {
        /// Request file (json, yaml or toml)
        request: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Install a copy of a local file into the store
    Install {
        #[arg(long)]
        group_id: String,
        #[arg(long)]
        artifact_id: String,
        #[arg(long)]
        version: String,
        /// Artifact file; it is copied and never modified
        file: PathBuf,
    },
    /// Print the metadata descriptor of an installed artifact
    Metadata {
        group_id: String,
        artifact_id: String,
        /// Output format (xml or json)
        #[arg(long, default_value = "xml")]
        format: String,
    },
    /// Local store commands
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand)]
pub enum StoreCommands {
    /// List installed artifacts
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context for executing commands
pub struct CliContext {
    service: LoaderService,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(config: &LoadtreeConfig) -> Result<Self, ApiError> {
        Ok(Self {
            service: LoaderService::from_config(config)?,
        })
    }

    pub fn with_service(service: LoaderService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &LoaderService {
        &self.service
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Apply { script, format } => self.handle_apply(script, format).await,
            Commands::Resolve { request, format } => self.handle_resolve(request, format).await,
            Commands::Install {
                group_id,
                artifact_id,
                version,
                file,
            } => {
                let coordinate = ArtifactCoordinate::new(group_id, artifact_id, version);
                self.handle_install(&coordinate, file)
            }
            Commands::Metadata {
                group_id,
                artifact_id,
                format,
            } => self.handle_metadata(group_id, artifact_id, format),
            Commands::Store {
                command: StoreCommands::List { format },
            } => self.handle_store_list(format),
        };

        tracing::info!(
            command = command.name(),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    async fn handle_apply(&self, path: &Path, format: &str) -> Result<String, ApiError> {
        let script = Script::from_path(path)?;
        let outcomes = self.service.apply(script).await?;
        let contexts = self.service.snapshot();

        match OutputFormat::parse(format)? {
            OutputFormat::Json => to_json(&ApplyReport {
                outcomes,
                contexts,
            }),
            OutputFormat::Text => Ok(format!(
                "{}\n{}",
                format_outcomes_table(&outcomes),
                format_contexts_table(&contexts)
            )),
        }
    }

    async fn handle_resolve(&self, path: &Path, format: &str) -> Result<String, ApiError> {
        let request = ContextRequest::from_path(path)?;
        let resolved = self.service.resolve(&request.data).await?;

        match OutputFormat::parse(format)? {
            OutputFormat::Json => to_json(&resolved),
            OutputFormat::Text => Ok(format_resolved_table(&resolved)),
        }
    }

    fn handle_install(
        &self,
        coordinate: &ArtifactCoordinate,
        file: &Path,
    ) -> Result<String, ApiError> {
        let payload = PayloadSource::copy_of(file)?;
        let path = self.service.install(coordinate, payload)?;
        Ok(format!("Installed {} at {}", coordinate, path.display()))
    }

    fn handle_metadata(
        &self,
        group_id: &str,
        artifact_id: &str,
        format: &str,
    ) -> Result<String, ApiError> {
        let bytes = self.service.metadata(group_id, artifact_id)?;
        match format {
            "xml" => Ok(String::from_utf8_lossy(&bytes).trim_end().to_string()),
            "json" => {
                let metadata = ArtifactMetadata::parse(&bytes)?;
                to_json(&metadata)
            }
            other => Err(ApiError::RequestError(format!(
                "Unsupported metadata format '{}' (expected xml or json)",
                other
            ))),
        }
    }

    fn handle_store_list(&self, format: &str) -> Result<String, ApiError> {
        let installed = self.service.list_installed()?;
        match OutputFormat::parse(format)? {
            OutputFormat::Json => to_json(&installed),
            OutputFormat::Text => {
                if installed.is_empty() {
                    return Ok("No artifacts installed.".to_string());
                }
                let mut table = new_table(vec!["Group", "Artifact", "Version"]);
                for coordinate in &installed {
                    table.add_row(vec![
                        &coordinate.group_id,
                        &coordinate.artifact_id,
                        &coordinate.version,
                    ]);
                }
                Ok(table.to_string())
            }
        }
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Apply { .. } => "apply",
            Commands::Resolve { .. } => "resolve",
            Commands::Install { .. } => "install",
            Commands::Metadata { .. } => "metadata",
            Commands::Store { .. } => "store list",
        }
    }
}

enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ApiError::RequestError(format!(
                "Unsupported output format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

#[derive(Serialize)]
struct ApplyReport {
    outcomes: Vec<ScriptOutcome>,
    contexts: Vec<ContextSummary>,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::RequestError(format!("Failed to serialize output: {}", e)))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header);
    table
}

fn format_outcomes_table(outcomes: &[ScriptOutcome]) -> String {
    let mut table = new_table(vec!["Operation", "Name", "Result"]);
    for outcome in outcomes {
        match outcome {
            ScriptOutcome::Create { name, load_path } => {
                table.add_row(vec![
                    "create".to_string(),
                    name.clone(),
                    format!("{} load path entries", load_path),
                ]);
            }
            ScriptOutcome::Remove { name, removed } => {
                table.add_row(vec![
                    "remove".to_string(),
                    name.clone(),
                    format!("{} removed", removed),
                ]);
            }
        }
    }
    table.to_string()
}

fn format_contexts_table(contexts: &[ContextSummary]) -> String {
    if contexts.is_empty() {
        return "No contexts registered.".to_string();
    }
    let mut table = new_table(vec!["Context", "Parent", "Load Path"]);
    for context in contexts {
        let parent = match &context.parent {
            crate::context::ParentLink::None => "-".to_string(),
            crate::context::ParentLink::Host => crate::context::HOST_CONTEXT_NAME.to_string(),
            crate::context::ParentLink::Context(name) => name.clone(),
        };
        table.add_row(vec![
            context.name.clone(),
            parent,
            context.load_path.join("\n"),
        ]);
    }
    table.to_string()
}

fn format_resolved_table(resolved: &[ResolvedArtifact]) -> String {
    if resolved.is_empty() {
        return "Nothing to resolve.".to_string();
    }
    let mut table = new_table(vec!["Artifact", "Local URL"]);
    for artifact in resolved {
        table.add_row(vec![artifact.coordinate.to_string(), artifact.url.to_string()]);
    }
    table.to_string()
}
