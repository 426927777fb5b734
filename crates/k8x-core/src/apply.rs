//! Apply sequencing against a live cluster.
//!
//! One scoped temp file carries the manifests to the cluster-apply tool:
//!
//! 1. namespace pass (only when the export declares a namespace): write the
//!    namespace block alone, apply it, pause if the tool reports `created`,
//!    then truncate and rewind the file
//! 2. manifest pass: write the joined component blocks and apply them
//!
//! The temp file is removed on every exit path by `Drop`.
//!
//! ## Known gaps
//!
//! - Readiness is detected by matching `created` in the tool's stdout. This
//!   breaks with localized or reformatted output but is kept for compatibility.
//! - The tool's exit status and stderr are never treated as errors. Both are
//!   recorded in `ApplyOutput` and logged, and the sequence carries on.

use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::assemble::AssembledContent;
use crate::config::KubectlConfig;

/// Substring of the tool output that signals a freshly created namespace.
pub const CREATED_MARKER: &str = "created";

/// Returns whether a namespace apply output signals that the namespace was
/// just created.
pub fn signals_creation(output: &str) -> bool {
    output.contains(CREATED_MARKER)
}

/// Captured result of one cluster-apply invocation.
#[derive(Debug, Clone, Default)]
pub struct ApplyOutput {
    /// Captured stdout (lossy UTF-8). Empty if the tool could not be started.
    pub stdout: String,
    /// Captured stderr. Logged only.
    pub stderr: String,
    /// Exit status, or `None` if the tool could not be started.
    pub status: Option<ExitStatus>,
}

impl ApplyOutput {
    /// Output of a tool that never ran.
    pub fn not_started() -> Self {
        Self::default()
    }
}

/// The cluster-apply tool seam.
pub trait ClusterApply {
    /// Applies the manifest file. Never fails: start-up failures yield an
    /// empty output.
    fn apply(&self, manifest: &Path) -> ApplyOutput;

    /// Blocks for the readiness delay.
    fn pause(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// `kubectl apply -f <path>`.
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl Kubectl {
    pub fn from_config(config: &KubectlConfig) -> Self {
        Self {
            binary: PathBuf::from(&config.binary),
            extra_args: config.extra_args.clone(),
        }
    }
}

impl ClusterApply for Kubectl {
    fn apply(&self, manifest: &Path) -> ApplyOutput {
        tracing::info!(binary = %self.binary.display(), path = %manifest.display(), "kubectl apply");

        let result = Command::new(&self.binary)
            .arg("apply")
            .args(&self.extra_args)
            .arg("-f")
            .arg(manifest)
            .output();

        match result {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                if !output.status.success() {
                    tracing::warn!(status = %output.status, stderr = %stderr.trim(), "kubectl apply exited unsuccessfully");
                } else if !stderr.trim().is_empty() {
                    tracing::warn!(stderr = %stderr.trim(), "kubectl apply wrote to stderr");
                }
                ApplyOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr,
                    status: Some(output.status),
                }
            }
            Err(e) => {
                tracing::warn!(binary = %self.binary.display(), error = %e, "failed to start kubectl");
                ApplyOutput::not_started()
            }
        }
    }
}

/// Tunables for one apply sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Pause after a namespace apply that reported `created`.
    pub readiness_delay: Duration,
}

impl ApplyOptions {
    pub const DEFAULT_READINESS_DELAY: Duration = Duration::from_secs(1);
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            readiness_delay: Self::DEFAULT_READINESS_DELAY,
        }
    }
}

impl From<&KubectlConfig> for ApplyOptions {
    fn from(config: &KubectlConfig) -> Self {
        Self {
            readiness_delay: Duration::from_millis(config.readiness_delay_ms),
        }
    }
}

/// What happened during one apply sequence.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Output of the namespace pass, when there was one.
    pub namespace: Option<ApplyOutput>,
    /// Whether the readiness pause was taken.
    pub paused: bool,
    /// Output of the manifest pass.
    pub manifests: ApplyOutput,
}

/// File the sequencer writes manifests into.
pub trait ManifestFile {
    fn path(&self) -> &Path;

    /// Writes `text` at the current position and flushes.
    fn write_manifest(&mut self, text: &str) -> io::Result<()>;

    /// Truncates to empty and rewinds to the start.
    fn reset(&mut self) -> io::Result<()>;
}

impl ManifestFile for NamedTempFile {
    fn path(&self) -> &Path {
        NamedTempFile::path(self)
    }

    fn write_manifest(&mut self, text: &str) -> io::Result<()> {
        self.write_all(text.as_bytes())?;
        self.flush()
    }

    fn reset(&mut self) -> io::Result<()> {
        self.as_file().set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// Creates the scoped temp file for one sequence.
pub fn scoped_temp_file() -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix("k8x-")
        .suffix(".yaml")
        .tempfile()
        .context("Failed to create temporary manifest file")
}

/// Runs a full apply sequence in a fresh temp file.
///
/// Tool output is forwarded to `out` as it arrives.
pub fn apply(
    content: &AssembledContent,
    tool: &impl ClusterApply,
    options: &ApplyOptions,
    out: &mut impl Write,
) -> Result<ApplyReport> {
    let file = scoped_temp_file()?;
    apply_in(file, content, tool, options, out)
}

/// Runs a full apply sequence in `file`, which is dropped (and for temp files
/// removed) before returning on every path.
pub fn apply_in<F: ManifestFile>(
    mut file: F,
    content: &AssembledContent,
    tool: &impl ClusterApply,
    options: &ApplyOptions,
    out: &mut impl Write,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    if let Some(namespace) = content.namespace_block() {
        tracing::debug!(path = %file.path().display(), "applying namespace");
        file.write_manifest(namespace)
            .context("Failed to write namespace manifest")?;

        let output = tool.apply(file.path());
        write!(out, "{}", output.stdout).context("Failed to forward kubectl output")?;
        out.flush().context("Failed to forward kubectl output")?;

        if signals_creation(&output.stdout) {
            tracing::debug!(delay = ?options.readiness_delay, "namespace created, waiting");
            tool.pause(options.readiness_delay);
            report.paused = true;
        }
        report.namespace = Some(output);

        file.reset().context("Failed to reset temporary manifest file")?;
    }

    tracing::debug!(
        path = %file.path().display(),
        blocks = content.blocks().len(),
        "applying manifests"
    );
    file.write_manifest(&content.joined())
        .context("Failed to write manifests")?;

    let output = tool.apply(file.path());
    writeln!(out, "{}", output.stdout).context("Failed to forward kubectl output")?;
    report.manifests = output;

    Ok(report)
}
