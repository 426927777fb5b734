//! Pager runtime: owns the terminal, runs the event loop, executes effects.
//!
//! One event is read, reduced and rendered before the next is read. The only
//! blocking point is `event::read`.

use anyhow::{Context, Result};
use crossterm::event;

use crate::effects::PagerEffect;
use crate::events::PagerEvent;
use crate::state::PagerState;
use crate::terminal::{self, PagerTerminal};
use crate::theme::Theme;
use crate::{render, update};

pub struct PagerRuntime {
    terminal: PagerTerminal,
    pub state: PagerState,
    theme: Theme,
}

impl PagerRuntime {
    /// Takes over the terminal.
    pub fn new(state: PagerState, theme: Theme) -> Result<Self> {
        // Panic hook goes in before the alternate screen.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        Ok(Self {
            terminal,
            state,
            theme,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        // crossterm only reports resizes after they happen, so the initial
        // size is fed in by hand.
        let size = self.terminal.size()?;
        let initial = PagerEvent::Resize {
            width: size.width,
            height: size.height,
        };

        let Self {
            terminal,
            state,
            theme,
        } = self;
        run_loop(
            state,
            initial,
            |state| {
                terminal.draw(|frame| render::render(state, theme, frame))?;
                Ok(())
            },
            || {
                let raw = event::read().context("Failed to read terminal event")?;
                Ok(PagerEvent::from_terminal(raw))
            },
        )
    }
}

/// Draws, then reduces events from `next_event` until a `Quit` effect.
///
/// Nothing is drawn after the event that quits. `None` from `next_event` is
/// an ignored terminal event.
fn run_loop(
    state: &mut PagerState,
    initial: PagerEvent,
    mut draw: impl FnMut(&PagerState) -> Result<()>,
    mut next_event: impl FnMut() -> Result<Option<PagerEvent>>,
) -> Result<()> {
    draw(state)?;
    if dispatch(state, initial) {
        return Ok(());
    }

    loop {
        draw(state)?;

        let Some(event) = next_event()? else {
            continue;
        };
        if dispatch(state, event) {
            return Ok(());
        }
    }
}

/// Runs one event through the reducer. Returns true when the pager should
/// stop.
fn dispatch(state: &mut PagerState, event: PagerEvent) -> bool {
    update::update(state, event)
        .into_iter()
        .any(|effect| matches!(effect, PagerEffect::Quit))
}

impl Drop for PagerRuntime {
    fn drop(&mut self) {
        if let Err(e) = terminal::restore_terminal() {
            tracing::warn!("Failed to restore terminal: {e:#}");
        }
    }
}
