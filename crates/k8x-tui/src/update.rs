//! Pager reducer.
//!
//! `update` mutates state and returns effects. It never touches the terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::effects::PagerEffect;
use crate::events::PagerEvent;
use crate::render::{footer_height, header_height};
use crate::state::PagerState;

pub fn update(state: &mut PagerState, event: PagerEvent) -> Vec<PagerEffect> {
    match &event {
        PagerEvent::Key(key) if is_quit_key(key) => return vec![PagerEffect::Quit],
        PagerEvent::Resize { width, height } => {
            handle_resize(state, *width, *height);
        }
        _ => {}
    }

    state.viewport.update(&event);
    Vec::new()
}

fn handle_resize(state: &mut PagerState, width: u16, height: u16) {
    let viewport_height = height
        .saturating_sub(header_height())
        .saturating_sub(footer_height());

    state.viewport.set_size(width, viewport_height);
    if state.ready {
        return;
    }

    state.viewport.set_content(Arc::clone(&state.content));
    state.ready = true;
    tracing::debug!(
        width,
        height = viewport_height,
        lines = state.content.len(),
        "pager viewport seeded"
    );
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Style, StyledLine};

    fn state(lines: usize) -> PagerState {
        let content = (0..lines)
            .map(|i| StyledLine::plain(format!("line {i}"), Style::Code))
            .collect();
        PagerState::new(content, "k8x render view")
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> PagerEvent {
        PagerEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn resize(width: u16, height: u16) -> PagerEvent {
        PagerEvent::Resize { width, height }
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q'), KeyModifiers::NONE),
            key(KeyCode::Esc, KeyModifiers::NONE),
            key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut s = state(10);
            assert_eq!(update(&mut s, event.clone()), vec![PagerEffect::Quit]);
            assert!(!s.ready);

            update(&mut s, resize(80, 24));
            assert_eq!(update(&mut s, event), vec![PagerEffect::Quit]);
        }
    }

    #[test]
    fn test_plain_c_is_not_quit() {
        let mut s = state(10);
        assert!(update(&mut s, key(KeyCode::Char('c'), KeyModifiers::NONE)).is_empty());
    }

    #[test]
    fn test_quit_does_not_scroll() {
        let mut s = state(100);
        update(&mut s, resize(80, 16));
        s.viewport.scroll_down(5);

        update(&mut s, key(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(s.viewport.y_offset(), 5);
    }

    #[test]
    fn test_first_resize_seeds_content() {
        let mut s = state(100);
        assert!(!s.ready);
        assert_eq!(s.viewport.total_lines(), 0);

        let effects = update(&mut s, resize(80, 24));

        assert!(effects.is_empty());
        assert!(s.ready);
        assert_eq!(s.viewport.width, 80);
        assert_eq!(s.viewport.height, 24 - header_height() - footer_height());
        assert_eq!(s.viewport.total_lines(), 100);
        assert!(Arc::ptr_eq(s.viewport.content(), &s.content));
    }

    #[test]
    fn test_later_resize_only_resizes() {
        let mut s = state(100);
        update(&mut s, resize(80, 24));
        s.viewport.goto_bottom();

        // Content replaced after seeding must not be picked up again.
        s.content = Arc::from(Vec::new());
        update(&mut s, resize(100, 50));

        assert_eq!(s.viewport.total_lines(), 100);
        assert_eq!(s.viewport.width, 100);
        assert_eq!(s.viewport.height, 50 - header_height() - footer_height());
        assert_eq!(s.viewport.y_offset(), s.viewport.max_y_offset());
    }

    #[test]
    fn test_tiny_window_saturates() {
        let mut s = state(10);
        update(&mut s, resize(10, 2));

        assert!(s.ready);
        assert_eq!(s.viewport.height, 0);
        assert!(s.viewport.visible_lines().is_empty());
    }

    #[test]
    fn test_scroll_keys_reach_viewport() {
        let mut s = state(100);
        update(&mut s, resize(80, 24));

        update(&mut s, key(KeyCode::Char('j'), KeyModifiers::NONE));
        update(&mut s, key(KeyCode::Char('d'), KeyModifiers::CONTROL));

        let half = usize::from(s.viewport.height / 2);
        assert_eq!(s.viewport.y_offset(), 1 + half);
    }
}
