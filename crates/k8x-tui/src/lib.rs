//! Full-screen pager for rendered k8x manifests.

pub mod effects;
pub mod events;
pub mod highlight;
pub mod markdown;
pub mod render;
pub mod runtime;
pub mod state;
pub mod style;
pub mod terminal;
pub mod theme;
pub mod update;
pub mod viewport;

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use k8x_core::config::PagerConfig;
pub use runtime::PagerRuntime;

use crate::state::PagerState;
use crate::style::StyledLine;
use crate::theme::Theme;

/// Renders manifest text the way the pager shows it.
pub fn render_preview(text: &str) -> Vec<StyledLine> {
    markdown::render_markdown(&markdown::fence_yaml(text))
}

/// Shows manifest text in the pager until the user quits.
pub fn run_pager(text: &str, config: &PagerConfig) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Run without --interactive to apply the manifests instead."
        );
    }

    let lines = render_preview(text);
    tracing::debug!(lines = lines.len(), "starting pager");

    let state = PagerState::new(lines, config.title.clone());
    let mut runtime = PagerRuntime::new(state, Theme::from_name(config.theme))?;
    runtime.run()
}
