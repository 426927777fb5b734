//! Chart evaluation boundary.
//!
//! A chart is evaluated by an external collaborator that yields an untyped
//! export mapping (`components`, `namespace`). This module owns the seam:
//! - `Evaluator`: `load(path, verbose) -> Program`, `run(&Program) -> Export`
//! - `Export`: the typed result, validated once here so downstream code never
//!   inspects the raw mapping again
//!
//! Two evaluators ship with k8x:
//! - `DataEvaluator` for charts that are already data (`.json`, `.yaml`, `.yml`)
//! - `CommandEvaluator` for everything else, delegating to a configured command

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use serde_yaml::Value;

use crate::config::EvaluatorConfig;

/// A single manifest document, as produced by the evaluator.
pub type Document = Value;

/// Returns whether a raw `namespace` export value names a namespace.
///
/// Valid iff the value is present, non-null and not the empty string. Any other
/// value (including non-string scalars) counts as valid. Both rendering modes
/// go through this predicate.
pub fn has_valid_namespace(namespace: &Value) -> bool {
    match namespace {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Tagged(tagged) => has_valid_namespace(&tagged.value),
        _ => true,
    }
}

/// Typed evaluator result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Export {
    /// Manifest documents in export order. `None` marks a null entry.
    pub components: Vec<Option<Document>>,
    namespace: Option<String>,
}

impl Export {
    /// Builds an export from already-typed parts.
    ///
    /// An empty namespace is normalized to `None`.
    pub fn new(components: Vec<Option<Document>>, namespace: Option<String>) -> Self {
        Self {
            components,
            namespace: namespace.filter(|ns| !ns.is_empty()),
        }
    }

    /// Validates a raw export mapping into the typed form.
    ///
    /// - `components` must be a sequence (missing or null means empty); entries
    ///   may be null
    /// - `namespace` may be missing, null, or any scalar; scalars other than
    ///   strings are stringified
    ///
    /// A mapping or sequence `namespace` passes `has_valid_namespace` but is a
    /// hard error here. It is not passed through to the namespace manifest,
    /// so such a chart fails before anything is rendered or applied.
    pub fn from_value(raw: Value) -> Result<Self> {
        let Value::Mapping(mut map) = raw else {
            bail!("chart export must be a mapping, got {}", kind_of(&raw));
        };

        let components = match map.remove("components") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Null => None,
                    other => Some(other),
                })
                .collect(),
            Some(other) => bail!(
                "chart export `components` must be a sequence, got {}",
                kind_of(&other)
            ),
        };

        let namespace = match map.remove("namespace") {
            Some(value) if has_valid_namespace(&value) => Some(namespace_name(&value)?),
            _ => None,
        };

        Ok(Self::new(components, namespace))
    }

    /// Returns the namespace name when it is valid.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Iterates over the non-null components in export order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.components.iter().flatten()
    }
}

fn namespace_name(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Tagged(tagged) => namespace_name(&tagged.value),
        other => bail!(
            "chart export `namespace` must be a scalar, got {}; structured namespaces are not rendered",
            kind_of(other)
        ),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// A loaded chart, ready to be run.
#[derive(Debug, Clone)]
pub struct Program {
    pub path: PathBuf,
    pub source: String,
    pub verbose: bool,
}

/// The chart evaluator seam.
pub trait Evaluator {
    /// Loads the chart at `path`. Failure is fatal for the invocation.
    fn load(&self, path: &Path, verbose: bool) -> Result<Program>;

    /// Runs a loaded chart and returns its validated export.
    fn run(&self, program: &Program) -> Result<Export>;
}

/// Reads the chart source, shared by both evaluators.
fn read_program(path: &Path, verbose: bool) -> Result<Program> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to load chart {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded chart");
    if verbose {
        tracing::info!(path = %path.display(), "chart source:\n{source}");
    }
    Ok(Program {
        path: path.to_path_buf(),
        source,
        verbose,
    })
}

/// Evaluator for charts that are plain data.
///
/// The top-level document is the export mapping itself. JSON is parsed with
/// `serde_json`, anything else as YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataEvaluator;

impl Evaluator for DataEvaluator {
    fn load(&self, path: &Path, verbose: bool) -> Result<Program> {
        read_program(path, verbose)
    }

    fn run(&self, program: &Program) -> Result<Export> {
        let raw: Value = if has_extension(&program.path, &["json"]) {
            let json: serde_json::Value = serde_json::from_str(&program.source)
                .with_context(|| format!("Failed to parse {}", program.path.display()))?;
            serde_yaml::to_value(json).context("Failed to convert JSON export")?
        } else {
            serde_yaml::from_str(&program.source)
                .with_context(|| format!("Failed to parse {}", program.path.display()))?
        };

        Export::from_value(raw)
            .with_context(|| format!("Invalid chart export in {}", program.path.display()))
    }
}

/// Evaluator that delegates to an external command.
///
/// The chart path is appended to the configured argv and the command's stdout
/// is parsed as a JSON export. `K8X_VERBOSE=1` is set for verbose loads.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    command: Vec<String>,
}

impl CommandEvaluator {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Evaluator for CommandEvaluator {
    fn load(&self, path: &Path, verbose: bool) -> Result<Program> {
        if self.command.is_empty() {
            bail!(
                "No evaluator configured for {}. Set `evaluator.command` in the config file.",
                path.display()
            );
        }
        read_program(path, verbose)
    }

    fn run(&self, program: &Program) -> Result<Export> {
        let Some((program_name, args)) = self.command.split_first() else {
            bail!("evaluator command is empty");
        };

        let mut cmd = Command::new(program_name);
        cmd.args(args).arg(&program.path);
        if program.verbose {
            cmd.env("K8X_VERBOSE", "1");
        }

        tracing::debug!(command = ?self.command, path = %program.path.display(), "running evaluator");
        let output = cmd
            .output()
            .with_context(|| format!("Failed to start evaluator `{program_name}`"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "evaluator `{program_name}` failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Failed to parse output of evaluator `{program_name}`"))?;
        let raw = serde_yaml::to_value(json).context("Failed to convert evaluator output")?;

        Export::from_value(raw)
            .with_context(|| format!("Invalid chart export from {}", program.path.display()))
    }
}

/// Picks the evaluator for a chart path.
///
/// Data charts are always read directly; other charts need a configured
/// command.
pub fn evaluator_for(path: &Path, config: &EvaluatorConfig) -> Box<dyn Evaluator> {
    if has_extension(path, &["json", "yaml", "yml"]) {
        Box::new(DataEvaluator)
    } else {
        Box::new(CommandEvaluator::new(config.command.clone()))
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
