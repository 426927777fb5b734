//! Pure render functions for the pager.
//!
//! Functions here take `&PagerState` and draw to a ratatui `Frame`. They never
//! mutate state.
//!
//! Layout:
//! ```text
//! ╭─────────────────╮
//! │ k8x render view ├──────────────
//! ╰─────────────────╯
//! <visible content>
//!                        ╭──────╮
//! ───────────────────────┤  42% │
//!                        ╰──────╯
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::state::PagerState;
use crate::theme::Theme;

/// Rows taken by a bordered chip (border, text, border).
const CHIP_HEIGHT: u16 = 3;

const PLACEHOLDER: &str = "\n  Initializing...";

const RULE: &str = "─";

pub fn header_height() -> u16 {
    CHIP_HEIGHT
}

pub fn footer_height() -> u16 {
    CHIP_HEIGHT
}

/// Footer text for a scroll fraction, e.g. `" 42%"`.
pub fn format_percent(percent: f64) -> String {
    format!("{:3.0}%", percent * 100.0)
}

pub fn render(state: &PagerState, theme: &Theme, frame: &mut Frame) {
    let area = frame.area();

    if !state.ready {
        frame.render_widget(Paragraph::new(PLACEHOLDER).style(theme.placeholder), area);
        return;
    }

    let [header, content, footer] = Layout::vertical([
        Constraint::Length(header_height()),
        Constraint::Min(0),
        Constraint::Length(footer_height()),
    ])
    .areas(area);

    render_header(state, theme, frame, header);
    render_content(state, theme, frame, content);
    render_footer(state, theme, frame, footer);
}

fn render_header(state: &PagerState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let chip_width = chip_width(&state.title).min(area.width);
    let [chip, rest] =
        Layout::horizontal([Constraint::Length(chip_width), Constraint::Min(0)]).areas(area);

    let block = Block::bordered()
        .border_set(border::Set {
            vertical_right: "├",
            ..border::ROUNDED
        })
        .border_style(theme.chrome)
        .padding(Padding::horizontal(1));
    frame.render_widget(
        Paragraph::new(Span::styled(state.title.as_str(), theme.title)).block(block),
        chip,
    );

    render_rule(theme, frame, rest);
}

fn render_content(state: &PagerState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line<'static>> = state
        .viewport
        .visible_lines()
        .iter()
        .map(|line| theme.line(line))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(state: &PagerState, theme: &Theme, frame: &mut Frame, area: Rect) {
    let info = format_percent(state.viewport.scroll_percent());
    let chip_width = chip_width(&info).min(area.width);
    let [rest, chip] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(chip_width)]).areas(area);

    render_rule(theme, frame, rest);

    let block = Block::bordered()
        .border_set(border::Set {
            vertical_left: "┤",
            ..border::ROUNDED
        })
        .border_style(theme.chrome)
        .padding(Padding::horizontal(1));
    frame.render_widget(Paragraph::new(Span::styled(info, theme.info)).block(block), chip);
}

/// Draws a horizontal rule across the middle row of `area`.
fn render_rule(theme: &Theme, frame: &mut Frame, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(RULE.repeat(usize::from(row.width))).style(theme.chrome),
        row,
    );
}

/// Text width plus one cell of padding and one border cell on each side.
fn chip_width(text: &str) -> u16 {
    u16::try_from(text.width())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::events::PagerEvent;
    use crate::style::{Style, StyledLine};
    use crate::update::update;

    fn draw(state: &PagerState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(state, &Theme::dark(), frame))
            .unwrap();

        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    fn ready_state(lines: usize, width: u16, height: u16) -> PagerState {
        let content = (0..lines)
            .map(|i| StyledLine::plain(format!("line {i}"), Style::Code))
            .collect();
        let mut state = PagerState::new(content, "k8x render view");
        update(&mut state, PagerEvent::Resize { width, height });
        state
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "  0%");
        assert_eq!(format_percent(0.42), " 42%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn test_placeholder_before_ready() {
        let state = PagerState::new(vec![StyledLine::plain("x", Style::Code)], "title");
        let rows = draw(&state, 30, 5);

        assert_eq!(rows[0].trim(), "");
        assert_eq!(rows[1].trim_end(), "  Initializing...");
    }

    #[test]
    fn test_header_chip_and_rule() {
        let state = ready_state(20, 40, 12);
        let rows = draw(&state, 40, 12);

        assert!(rows[0].starts_with("╭─"));
        assert!(rows[1].starts_with("│ k8x render view ├"));
        assert!(rows[1].ends_with("──"));
        assert!(rows[2].starts_with("╰─"));
        assert_eq!(rows[1].chars().count(), 40);
    }

    #[test]
    fn test_content_window_and_footer() {
        let mut state = ready_state(20, 40, 12);
        assert_eq!(state.viewport.height, 6);

        let rows = draw(&state, 40, 12);
        assert_eq!(rows[3].trim_end(), "line 0");
        assert_eq!(rows[8].trim_end(), "line 5");
        assert!(rows[10].starts_with("──"));
        assert!(rows[10].ends_with("┤   0% │"));

        state.viewport.goto_bottom();
        let rows = draw(&state, 40, 12);
        assert_eq!(rows[3].trim_end(), "line 14");
        assert!(rows[10].ends_with("┤ 100% │"));
    }
}
