//! Terminal popup: contacts and templates, picked step by step, applied to
//! the active Gmail tab.

pub mod events;
pub mod form;
pub mod rows;
pub mod state;
pub mod tooltip;
pub mod ui;
pub mod wizard;

#[cfg(test)]
mod fakes;

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::crossterm::execute;

use crate::config::Config;
use crate::popup::events::{Context, follow_highlight, handle_key, handle_mouse, moves_highlight};
use crate::popup::state::AppState;
use crate::store::RemoteStore;
use crate::tab::TabHost;

pub fn run_popup(cfg: &Config, store: &dyn RemoteStore, host: &dyn TabHost) -> Result<()> {
    color_eyre::install()?;

    let mut state = AppState::new(cfg.flow);
    state.reload(store);

    let terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let ctx = Context {
        store,
        host,
        gmail_origin: &cfg.gmail_origin,
    };
    let result = run(terminal, &mut state, &ctx);

    execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, state: &mut AppState, ctx: &Context) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, state))?;

        match event::read()? {
            Event::Key(key) => {
                if handle_key(key, state, ctx) {
                    break;
                }
                if moves_highlight(&key) {
                    follow_highlight(state, screen(&terminal)?);
                }
            }
            Event::Mouse(ev) => {
                if handle_mouse(ev, state, screen(&terminal)?, ctx) {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn screen(terminal: &DefaultTerminal) -> Result<Rect> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}
