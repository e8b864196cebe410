use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::render::{draw_form, group_title};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(4)])
        .split(columns[0]);
    draw_form(
        frame,
        left[0],
        &app.relationship_forms,
        0,
        app.state.trip.is_loading(),
    );
    draw_history(frame, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(columns[1]);
    draw_form(
        frame,
        right[0],
        &app.relationship_forms,
        1,
        app.state.gifts.is_loading(),
    );
    draw_gifts(frame, right[1], app);
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Trip history", &app.state.trip_history));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(history) = app.state.trip_history.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    if history.is_empty() {
        frame.render_widget(Paragraph::new("no snapshots yet"), inner);
        return;
    }
    let lines: Vec<Line> = history
        .iter()
        .take(usize::from(inner.height))
        .map(|entry| {
            let snap = &entry.snapshot;
            let dates = if snap.start_date.is_empty() && snap.end_date.is_empty() {
                snap.dates.clone()
            } else {
                format!("{} - {}", snap.start_date, snap.end_date)
            };
            Line::from(format!(
                "{}  {dates}  lodging:{}  childcare:{}",
                entry.created_at,
                if snap.lodging_booked { "y" } else { "n" },
                if snap.childcare_confirmed { "y" } else { "n" },
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_gifts(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Gifts this month", &app.state.gifts));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(gifts) = app.state.gifts.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    if gifts.is_empty() {
        frame.render_widget(Paragraph::new("none logged yet"), inner);
        return;
    }
    let lines: Vec<Line> = gifts
        .iter()
        .take(usize::from(inner.height))
        .map(|g| Line::from(format!("{}  ${:.0}  {}", g.day, g.amount, g.description)))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
