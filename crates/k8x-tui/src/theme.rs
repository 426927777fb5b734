//! Pager color themes.
//!
//! A `Theme` is built once from config and passed by reference into the
//! render functions. Nothing here is process-global.

use k8x_core::config::ThemeName;
use ratatui::style::{Color, Modifier, Style as TermStyle};
use ratatui::text::{Line, Span};

use crate::style::{Style, StyledLine};

/// Terminal styles for chrome and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Borders and fill rules.
    pub chrome: TermStyle,
    /// Header title text.
    pub title: TermStyle,
    /// Footer percentage text.
    pub info: TermStyle,
    /// "Initializing..." placeholder.
    pub placeholder: TermStyle,
    pub code: TermStyle,
    pub key: TermStyle,
    pub string: TermStyle,
    pub number: TermStyle,
    pub literal: TermStyle,
    pub comment: TermStyle,
    pub separator: TermStyle,
    pub punctuation: TermStyle,
    pub dash: TermStyle,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            chrome: TermStyle::default().fg(Color::DarkGray),
            title: TermStyle::default().fg(Color::White).add_modifier(Modifier::BOLD),
            info: TermStyle::default().fg(Color::Gray),
            placeholder: TermStyle::default().fg(Color::Gray),
            code: TermStyle::default().fg(Color::Gray),
            key: TermStyle::default().fg(Color::LightBlue),
            string: TermStyle::default().fg(Color::LightGreen),
            number: TermStyle::default().fg(Color::LightMagenta),
            literal: TermStyle::default().fg(Color::LightYellow),
            comment: TermStyle::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            separator: TermStyle::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            punctuation: TermStyle::default().fg(Color::Gray),
            dash: TermStyle::default().fg(Color::LightRed),
        }
    }

    pub fn light() -> Self {
        Self {
            chrome: TermStyle::default().fg(Color::Gray),
            title: TermStyle::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            info: TermStyle::default().fg(Color::DarkGray),
            placeholder: TermStyle::default().fg(Color::DarkGray),
            code: TermStyle::default().fg(Color::Black),
            key: TermStyle::default().fg(Color::Blue),
            string: TermStyle::default().fg(Color::Green),
            number: TermStyle::default().fg(Color::Magenta),
            literal: TermStyle::default().fg(Color::Yellow),
            comment: TermStyle::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            separator: TermStyle::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
            punctuation: TermStyle::default().fg(Color::DarkGray),
            dash: TermStyle::default().fg(Color::Red),
        }
    }

    /// Translates a semantic style.
    pub fn style(&self, style: Style) -> TermStyle {
        match style {
            Style::Plain => TermStyle::default(),
            Style::Code => self.code,
            Style::Key => self.key,
            Style::String => self.string,
            Style::Number => self.number,
            Style::Literal => self.literal,
            Style::Comment => self.comment,
            Style::Separator => self.separator,
            Style::Punctuation => self.punctuation,
            Style::Dash => self.dash,
        }
    }

    /// Converts a styled line into a ratatui line.
    pub fn line(&self, line: &StyledLine) -> Line<'static> {
        Line::from(
            line.spans
                .iter()
                .map(|span| Span::styled(span.text.clone(), self.style(span.style)))
                .collect::<Vec<_>>(),
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
