use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::render::{draw_form, group_title};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_form(
        frame,
        columns[0],
        &app.settings_forms,
        0,
        app.state.settings.is_loading(),
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(columns[1]);
    draw_form(frame, right[0], &app.settings_forms, 1, false);
    draw_notes(frame, right[1], app);
}

fn draw_notes(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Current settings", &app.state.settings));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(format!("backend: {}", app.backend_origin()))];
    match app.state.settings.data() {
        Some(settings) => {
            lines.push(Line::from(format!(
                "weekly review: {} at {}:00 local",
                settings.weekly_review_day, settings.weekly_review_hour_local
            )));
            lines.push(Line::from(format!(
                "monthly gift day: {}  email: {}",
                settings.monthly_gift_day,
                if settings.email_enabled { "on" } else { "off" }
            )));
            if !settings.updated_at.is_empty() {
                lines.push(Line::from(format!("updated: {}", settings.updated_at)));
            }
        }
        None => lines.push(Line::from("no data yet")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(ratatui::text::Span::styled(
        "Set the app password with: tracker set-password <password>",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}
