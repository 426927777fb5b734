//! Pager state.

use std::sync::Arc;

use crate::style::StyledLine;
use crate::viewport::Viewport;

/// State owned by the pager loop.
///
/// Starts not ready. The first window size seeds the viewport with
/// `content`; from then on only the viewport changes.
#[derive(Debug, Clone)]
pub struct PagerState {
    pub ready: bool,
    /// Full rendered content, kept until the viewport is seeded.
    pub content: Arc<[StyledLine]>,
    pub viewport: Viewport,
    /// Header chip text.
    pub title: String,
}

impl PagerState {
    pub fn new(content: Vec<StyledLine>, title: impl Into<String>) -> Self {
        Self {
            ready: false,
            content: Arc::from(content),
            viewport: Viewport::default(),
            title: title.into(),
        }
    }
}
