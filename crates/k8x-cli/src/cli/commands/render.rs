//! Render command handler.
//!
//! Evaluates the chart, assembles the manifests, then either shows them in
//! the pager or applies them with kubectl.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use k8x_core::apply::{self, ApplyOptions, Kubectl};
use k8x_core::assemble::AssembledContent;
use k8x_core::chart;
use k8x_core::config::Config;
use k8x_core::dotenv;

pub struct RenderOptions<'a> {
    pub chart: &'a Path,
    pub interactive: bool,
    pub verbose: bool,
    pub config: &'a Config,
}

pub fn run(opts: &RenderOptions<'_>) -> Result<()> {
    dotenv::load()?;

    let content = assemble(opts)?;

    if opts.interactive {
        return k8x_tui::run_pager(&content.joined_with_namespace(), &opts.config.pager)
            .context("could not run program");
    }

    let kubectl = Kubectl::from_config(&opts.config.kubectl);
    let options = ApplyOptions::from(&opts.config.kubectl);
    let mut stdout = io::stdout().lock();
    let report = apply::apply(&content, &kubectl, &options, &mut stdout)?;

    tracing::debug!(
        namespace_applied = report.namespace.is_some(),
        paused = report.paused,
        status = ?report.manifests.status,
        "apply finished"
    );
    Ok(())
}

fn assemble(opts: &RenderOptions<'_>) -> Result<AssembledContent> {
    let evaluator = chart::evaluator_for(opts.chart, &opts.config.evaluator);
    let program = evaluator.load(opts.chart, opts.verbose)?;
    let export = evaluator.run(&program)?;
    tracing::debug!(
        components = export.components.len(),
        namespace = export.namespace().unwrap_or("<none>"),
        "chart evaluated"
    );

    AssembledContent::from_export(&export).context("Failed to assemble manifests")
}
