//! Rendering for the tab views. Pure: reads `App` and draws; every state
//! change happens in `app.rs`.

mod dashboard;
mod fitness;
mod mortgage;
mod relationship;
mod settings;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::app::{App, Tab};
use crate::forms::{Field, TabForms};
use tracker_core::Loadable;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // body
            Constraint::Length(1), // error banner
            Constraint::Length(1), // key hints
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_tabs(frame, chunks[1], app);
    match app.tab {
        Tab::Dashboard => dashboard::draw(frame, chunks[2], app),
        Tab::Fitness => fitness::draw(frame, chunks[2], app),
        Tab::Mortgage => mortgage::draw(frame, chunks[2], app),
        Tab::Relationship => relationship::draw(frame, chunks[2], app),
        Tab::Settings => settings::draw(frame, chunks[2], app),
    }
    draw_error_banner(frame, chunks[3], app);
    draw_hints(frame, chunks[4]);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            "2026 Accountability Tracker",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", app.state.today)),
    ];
    match app.backend_ok {
        Some(true) => spans.push(Span::styled("  backend: ok", Style::default().fg(Color::Green))),
        Some(false) => spans.push(Span::styled(
            "  backend: unreachable",
            Style::default().fg(Color::Red),
        )),
        None => {}
    }
    if app.state.bulk_loading {
        spans.push(Span::styled(
            "  refreshing...",
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = Tab::ALL.iter().map(|t| t.to_string()).collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_error_banner(frame: &mut Frame, area: Rect, app: &App) {
    if let Some(message) = &app.state.error {
        frame.render_widget(
            Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::White).bg(Color::Red)),
            area,
        );
    }
}

fn draw_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("Tab: switch view  Up/Down: fields  Space: toggle  Enter: submit  Ctrl+R: refresh  Esc: dismiss error  Ctrl+C: quit")
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Renders one form as a bordered list of label/value lines, highlighting
/// the focused field when this tab's focus is inside it.
pub(crate) fn draw_form(
    frame: &mut Frame,
    area: Rect,
    forms: &TabForms,
    form_index: usize,
    loading: bool,
) {
    let form = &forms.forms[form_index];
    let mut lines = Vec::with_capacity(form.fields.len());
    for (i, field) in form.fields.iter().enumerate() {
        let focused = forms.is_focused(form_index, i);
        let marker = if focused { "> " } else { "  " };
        let value = match field {
            Field::Text { input, .. } if focused => format!("{}_", input.value()),
            _ => field.display(),
        };
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", field.label()), style),
            Span::styled(value, style),
        ]));
    }
    let title = if loading {
        format!("{} (loading...)", form.title)
    } else {
        form.title.to_string()
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

/// Section title suffix for a data group's lifecycle.
pub(crate) fn group_title<T>(base: &str, loadable: &Loadable<T>) -> String {
    if loadable.is_loading() {
        format!("{base} (loading...)")
    } else if loadable.is_failed() {
        format!("{base} (stale)")
    } else {
        base.to_string()
    }
}
