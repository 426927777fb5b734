//! Scrollable window into the rendered content.
//!
//! The viewport owns the scroll offset and its own key/mouse bindings. Every
//! operation keeps `y_offset <= max_y_offset()`.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::events::PagerEvent;
use crate::style::StyledLine;

/// Lines scrolled per mouse wheel notch.
pub const MOUSE_WHEEL_DELTA: usize = 3;

#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    y_offset: usize,
    lines: Arc<[StyledLine]>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            y_offset: 0,
            lines: Arc::from(Vec::new()),
        }
    }

    pub fn set_content(&mut self, lines: Arc<[StyledLine]>) {
        self.lines = lines;
        self.clamp();
    }

    /// Resizes without touching the content; the offset is clamped.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
    }

    pub fn content(&self) -> &Arc<[StyledLine]> {
        &self.lines
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn max_y_offset(&self) -> usize {
        self.total_lines().saturating_sub(usize::from(self.height))
    }

    /// Fraction of the content scrolled past, in `0.0..=1.0`.
    ///
    /// Content that fits entirely counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let height = usize::from(self.height);
        let total = self.total_lines();
        if height >= total {
            return 1.0;
        }
        let percent = self.y_offset as f64 / (total - height) as f64;
        percent.clamp(0.0, 1.0)
    }

    /// Lines currently inside the window.
    pub fn visible_lines(&self) -> &[StyledLine] {
        let start = self.y_offset.min(self.total_lines());
        let end = (start + usize::from(self.height)).min(self.total_lines());
        &self.lines[start..end]
    }

    pub fn set_y_offset(&mut self, offset: usize) {
        self.y_offset = offset.min(self.max_y_offset());
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_add(n));
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.set_y_offset(self.y_offset.saturating_sub(n));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.half_height());
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up(self.half_height());
    }

    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Default handling for scroll keys and the mouse wheel.
    pub fn update(&mut self, event: &PagerEvent) {
        match event {
            PagerEvent::Key(key) => self.handle_key(key),
            PagerEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_down(MOUSE_WHEEL_DELTA),
                MouseEventKind::ScrollUp => self.scroll_up(MOUSE_WHEEL_DELTA),
                _ => {}
            },
            PagerEvent::Resize { .. } => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Char('d') => self.half_page_down(),
            KeyCode::Char('u') => self.half_page_up(),
            KeyCode::PageDown | KeyCode::Char('f' | ' ') if !ctrl => self.page_down(),
            KeyCode::PageUp | KeyCode::Char('b') if !ctrl => self.page_up(),
            KeyCode::Home | KeyCode::Char('g') => self.goto_top(),
            KeyCode::End | KeyCode::Char('G') => self.goto_bottom(),
            _ => {}
        }
    }

    fn half_height(&self) -> usize {
        (usize::from(self.height) / 2).max(1)
    }

    fn clamp(&mut self) {
        self.y_offset = self.y_offset.min(self.max_y_offset());
    }
}
