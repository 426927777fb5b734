//! Pager events.
//!
//! Everything the reducer reacts to. Terminal events are converted once at
//! the runtime boundary; focus, paste and other crossterm events are dropped
//! there.

use crossterm::event::{Event, KeyEvent, MouseEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerEvent {
    /// Terminal window size, in cells.
    Resize { width: u16, height: u16 },
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl PagerEvent {
    /// Converts a crossterm event, returning `None` for events the pager ignores.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Resize(width, height) => Some(Self::Resize { width, height }),
            Event::Key(key) => Some(Self::Key(key)),
            Event::Mouse(mouse) => Some(Self::Mouse(mouse)),
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_from_terminal() {
        assert_eq!(
            PagerEvent::from_terminal(Event::Resize(80, 24)),
            Some(PagerEvent::Resize {
                width: 80,
                height: 24
            })
        );

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            PagerEvent::from_terminal(Event::Key(key)),
            Some(PagerEvent::Key(key))
        );

        assert_eq!(PagerEvent::from_terminal(Event::FocusLost), None);
        assert_eq!(PagerEvent::from_terminal(Event::Paste("x".into())), None);
    }
}
