use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::Flow;
use crate::popup::state::AppState;
use crate::popup::ui::{layout, row_at, row_position};
use crate::popup::wizard::Step;
use crate::store::RemoteStore;
use crate::tab::TabHost;

/// What the key handlers need besides the state.
pub struct Context<'a> {
    pub store: &'a dyn RemoteStore,
    pub host: &'a dyn TabHost,
    pub gmail_origin: &'a str,
}

/// Returns `true` when the popup should close.
pub fn handle_key(key: KeyEvent, state: &mut AppState, ctx: &Context) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    if state.alert.take().is_some() {
        return false;
    }

    if state.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') => state.confirm_delete(ctx.store),
            KeyCode::Char('n') | KeyCode::Esc => state.cancel_delete(),
            _ => {}
        }
        return false;
    }

    if state.form.is_some() {
        handle_form_keys(key, state, ctx.store);
        return false;
    }

    if state.load_error.is_some() {
        return match key.code {
            KeyCode::Char('r') => {
                state.reload(ctx.store);
                false
            }
            KeyCode::Char('q') | KeyCode::Esc => true,
            _ => false,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,

        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Char(' ') => state.toggle_highlighted(),
        KeyCode::Tab if state.step() == Step::Recipients => state.cycle_kind(),

        KeyCode::Right | KeyCode::Char('n') => state.next_step(),
        KeyCode::Left | KeyCode::Char('p') => state.previous_step(),
        KeyCode::Enter => {
            if state.wizard.is_last() {
                state.apply(ctx.host, ctx.gmail_origin);
                return state.should_close;
            }
            state.next_step();
        }

        KeyCode::Char('a') => state.open_form(),
        KeyCode::Char('d') => state.request_delete(),
        KeyCode::Char('r') => state.reload(ctx.store),
        _ => {}
    }
    false
}

fn handle_form_keys(key: KeyEvent, state: &mut AppState, store: &dyn RemoteStore) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(form) = state.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => state.close_form(),
        KeyCode::Char('s') if ctrl => state.submit_form(store),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter if form.focused().multiline => form.newline(),
        KeyCode::Enter if form.is_last_field() => state.submit_form(store),
        KeyCode::Enter => form.focus_next(),
        KeyCode::Char(c) if !ctrl => form.push_char(c),
        _ => {}
    }
}

/// Keys that move the list highlight.
pub fn moves_highlight(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k')
    )
}

/// Keyboard counterpart of hovering: previews the highlighted template row
/// as if the pointer rested on it.
pub fn follow_highlight(state: &mut AppState, screen: Rect) {
    if state.step() != Step::Template || state.form.is_some() || state.alert.is_some() {
        return;
    }
    let main = layout(screen).main;
    let spot = state
        .template_list
        .selected()
        .and_then(|i| row_position(main, &state.template_list, i).map(|pos| (i, pos)));
    match spot {
        Some((i, (x, y))) => state.hover_template(Some(i), x, y),
        None => state.clear_hover(),
    }
}

/// Pointer movement drives the template preview; a left click moves the
/// highlight to the row under the pointer. In the template-only flow rows
/// carry no selection control, so clicking one applies it straight away.
/// Returns `true` when the popup should close.
pub fn handle_mouse(ev: MouseEvent, state: &mut AppState, screen: Rect, ctx: &Context) -> bool {
    if state.form.is_some() || state.pending_delete.is_some() || state.alert.is_some() {
        return false;
    }
    let main = layout(screen).main;
    let (col, row) = (ev.column, ev.row);

    match ev.kind {
        MouseEventKind::Moved if state.step() == Step::Template => {
            let index = row_at(main, &state.template_list, col, row);
            state.hover_template(index, col, row);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let (list, len) = match state.step() {
                Step::Recipients => (&mut state.contact_list, state.contacts.len()),
                Step::Template => (&mut state.template_list, state.templates.len()),
                Step::Review => return false,
            };
            let Some(i) = row_at(main, list, col, row).filter(|i| *i < len) else {
                return false;
            };
            list.select(Some(i));
            if state.flow == Flow::TemplateOnly {
                state.apply(ctx.host, ctx.gmail_origin);
                return state.should_close;
            }
        }
        _ => {}
    }
    false
}
