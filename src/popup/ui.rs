use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::domain::RecipientKind;
use crate::popup::form::RecordForm;
use crate::popup::rows::{ListRow, RenderedList, SelectMode};
use crate::popup::state::AppState;
use crate::popup::wizard::Step;

const TOOLTIP_WIDTH: u16 = 44;
const TOOLTIP_HEIGHT: u16 = 8;

/// Screen regions, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub header: Rect,
    pub main: Rect,
    pub nav: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let [header, main, nav, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(area);
    Areas {
        header,
        main,
        nav,
        footer,
    }
}

/// Index of the list row under `(x, y)`, given the bordered list at `area`.
pub fn row_at(area: Rect, list: &ListState, x: u16, y: u16) -> Option<usize> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let inside = x >= inner.x
        && x < inner.x + inner.width
        && y >= inner.y
        && y < inner.y + inner.height;
    inside.then(|| list.offset() + (y - inner.y) as usize)
}

/// Screen cell of the first column of row `index`, if it is scrolled into
/// view. Inverse of [`row_at`].
pub fn row_position(area: Rect, list: &ListState, index: usize) -> Option<(u16, u16)> {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let visible = index.checked_sub(list.offset())?;
    (visible < inner.height as usize).then(|| (inner.x, inner.y + visible as u16))
}

fn bold<'a>(s: impl Into<Cow<'a, str>>) -> Span<'a> {
    Span::styled(s, Style::default().add_modifier(Modifier::BOLD))
}

/// Takes the state mutably so list scroll offsets persist for hit-testing.
pub fn render(f: &mut Frame, state: &mut AppState) {
    if let Some(err) = &state.load_error {
        render_load_error(f, err);
        return;
    }

    let areas = layout(f.area());
    render_header(f, state, areas.header);

    match state.step() {
        Step::Recipients => {
            let title = format!(" Contacts (adding to {}) ", state.active_kind);
            render_rows(
                f,
                &state.contact_rows(),
                &title,
                areas.main,
                &mut state.contact_list,
            );
        }
        Step::Template => render_rows(
            f,
            &state.template_rows(),
            " Templates ",
            areas.main,
            &mut state.template_list,
        ),
        Step::Review => render_review(f, state, areas.main),
    }

    render_nav(f, state, areas.nav);
    render_footer(f, state, areas.footer);

    if state.tooltip.visible {
        render_tooltip(f, state);
    }
    if let Some(form) = &state.form {
        render_form(f, form);
    }
    if let Some(pending) = &state.pending_delete {
        render_modal(
            f,
            " Delete ",
            Text::from(vec![
                Line::from(format!("Delete {}?", pending.label)),
                Line::from(""),
                Line::from(vec![bold("y"), Span::raw(" yes  "), bold("n"), Span::raw(" no")]),
            ]),
            Color::Red,
        );
    }
    if let Some(alert) = &state.alert {
        render_modal(
            f,
            " Alert ",
            Text::from(vec![
                Line::from(alert.as_str()),
                Line::from(""),
                Line::styled("press any key", Style::default().fg(Color::DarkGray)),
            ]),
            Color::Yellow,
        );
    }
}

fn render_load_error(f: &mut Frame, err: &str) {
    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let text = Text::from(vec![
        Line::from(bold("Failed to fetch data.")),
        Line::from(""),
        Line::from(err),
        Line::from(""),
        Line::from(vec![bold("r"), Span::raw(" retry  "), bold("q"), Span::raw(" quit")]),
    ]);
    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    let [area] = Layout::vertical([Constraint::Fill(1)])
        .margin(1)
        .areas(f.area());
    f.render_widget(p, area);
}

fn render_header(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = Vec::new();
    for (i, step) in state.wizard.steps().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  >  "));
        }
        let style = if i + 1 == state.wizard.current() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(step.title(), style));
    }
    let block = Block::default()
        .title(format!(
            " Step {} of {} ",
            state.wizard.current(),
            state.wizard.total()
        ))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn marker(mode: SelectMode, checked: bool) -> &'static str {
    match (mode, checked) {
        (SelectMode::Multi, true) => "[x] ",
        (SelectMode::Multi, false) => "[ ] ",
        (SelectMode::Single, true) => "(•) ",
        (SelectMode::Single, false) => "( ) ",
        (SelectMode::ActionOnly, _) => "",
    }
}

fn render_rows(
    f: &mut Frame,
    rows: &RenderedList,
    title: &str,
    area: Rect,
    list: &mut ListState,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = rows
        .rows
        .iter()
        .map(|r| match r {
            ListRow::Item(row) => {
                let mark = row
                    .select
                    .as_ref()
                    .map(|s| marker(s.mode, s.checked))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Cyan)),
                    Span::raw(row.label.clone()),
                ]))
            }
            ListRow::Placeholder(text) => ListItem::new(Span::styled(
                text.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        })
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(widget, area, list);
}

fn render_review(f: &mut Frame, state: &AppState, area: Rect) {
    let mut lines = Vec::new();
    match state.chosen() {
        Some(t) => {
            lines.push(Line::from(vec![bold("Template: "), Span::raw(t.title.clone())]));
            lines.push(Line::from(vec![bold("Subject:  "), Span::raw(t.subject.clone())]));
        }
        None => lines.push(Line::styled(
            "No template chosen.",
            Style::default().fg(Color::DarkGray),
        )),
    }
    lines.push(Line::from(""));
    for kind in RecipientKind::ALL {
        let addrs = state.recipients.get(kind);
        let value = if addrs.is_empty() {
            "-".to_string()
        } else {
            addrs.join(", ")
        };
        lines.push(Line::from(vec![bold(format!("{:<4}", kind.to_string())), Span::raw(value)]));
    }

    let block = Block::default()
        .title(" Review ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_nav(f: &mut Frame, state: &AppState, area: Rect) {
    let controls = state.wizard.controls();
    let mut spans = Vec::new();
    if controls.previous {
        spans.push(Span::styled("[ < Previous ]", Style::default().fg(Color::Gray)));
        spans.push(Span::raw("  "));
    }
    if controls.next {
        spans.push(Span::styled("[ Next > ]", Style::default().fg(Color::Gray)));
    }
    if controls.apply {
        spans.push(Span::styled(
            "[ Apply ]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![bold("j/k"), Span::raw(" move  ")];
    match state.step() {
        Step::Recipients => {
            spans.extend([bold("Space"), Span::raw(" toggle  ")]);
            spans.extend([bold("Tab"), Span::raw(" To/Cc/Bcc  ")]);
        }
        Step::Template if state.wizard.total() > 1 => {
            spans.extend([bold("Space"), Span::raw(" choose  ")]);
        }
        _ => {}
    }
    if state.step() != Step::Review {
        spans.extend([bold("a"), Span::raw(" add  "), bold("d"), Span::raw(" delete  ")]);
    }
    spans.extend([
        bold("Enter"),
        Span::raw(if state.wizard.is_last() { " apply  " } else { " next  " }),
    ]);
    spans.extend([bold("r"), Span::raw(" reload  "), bold("q"), Span::raw(" quit")]);
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tooltip(f: &mut Frame, state: &AppState) {
    let screen = f.area();
    let tip = &state.tooltip;
    let width = TOOLTIP_WIDTH.min(screen.width);
    let height = TOOLTIP_HEIGHT.min(screen.height);
    let x = tip.x.min(screen.width.saturating_sub(width));
    let y = tip.y.min(screen.height.saturating_sub(height));
    let area = Rect::new(x, y, width, height);

    let text = Text::from(vec![
        Line::from(vec![bold("Subject: "), Span::raw(tip.subject.clone())]),
        Line::from(""),
        Line::from(tip.body.clone()),
    ]);
    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn render_modal(f: &mut Frame, title: &str, text: Text, border: Color) {
    let area = centered(f.area(), 50, 7);
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

fn render_form(f: &mut Frame, form: &RecordForm) {
    let heights: Vec<u16> = form
        .fields
        .iter()
        .map(|field| if field.multiline { 6 } else { 3 })
        .collect();
    let total = heights.iter().sum::<u16>() + 3;
    let area = centered(f.area(), 60, total);

    f.render_widget(Clear, area);
    let outer = Block::default()
        .title(form.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = heights.iter().map(|h| Constraint::Length(*h)).collect();
    constraints.push(Constraint::Length(1));
    let slots = Layout::vertical(constraints).split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let color = if i == form.focus {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(format!(" {} ", field.label))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let mut value = field.value.clone();
        if i == form.focus {
            value.push('_');
        }
        f.render_widget(
            Paragraph::new(value).block(block).wrap(Wrap { trim: false }),
            slots[i],
        );
    }

    let hint = Line::from(vec![
        bold("Tab"),
        Span::raw(" field  "),
        bold("Enter"),
        Span::raw(if form.focused().multiline { " newline  " } else { " next/save  " }),
        bold("Ctrl-S"),
        Span::raw(" save  "),
        bold("Esc"),
        Span::raw(" close"),
    ]);
    f.render_widget(Paragraph::new(hint), slots[form.fields.len()]);
}
