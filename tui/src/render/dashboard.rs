use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::render::{draw_form, group_title};
use tracker_core::derived::BadgeClass;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Min(4),
        ])
        .split(columns[0]);

    draw_kpis(frame, left[0], app);
    draw_weekly_review(frame, left[1], app);
    draw_badges(frame, left[2], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(columns[1]);

    draw_form(
        frame,
        right[0],
        &app.dashboard_forms,
        0,
        app.state.checkins.is_loading(),
    );
    draw_recent_checkins(frame, right[1], app);
}

fn draw_kpis(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Today", &app.state.summary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kpis) = &app.state.derived.kpis else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(inner);
    for (cell, kpi) in cells.iter().zip(kpis.iter()) {
        let text = vec![
            Line::from(Span::styled(
                kpi.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(kpi.label, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Paragraph::new(text), *cell);
    }
}

fn draw_weekly_review(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Weekly review", &app.state.weekly_review));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(review) = app.state.weekly_review.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    let rule = |label: &str, pass: bool| {
        let (mark, color) = if pass { ("[x]", Color::Green) } else { ("[ ]", Color::DarkGray) };
        Line::from(Span::styled(format!("{mark} {label}"), Style::default().fg(color)))
    };
    let lines = vec![
        Line::from(format!("{} - {}", review.week_start, review.week_end)),
        rule("4+ early wake-ups", review.wakeups_ge_4),
        rule("5 workouts", review.workouts_completed_5),
        rule("1+ video captured", review.captured_at_least_1_video),
        rule("mortgage action", review.mortgage_action_taken),
        rule("relationship action", review.relationship_action_taken),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_badges(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Reminders", &app.state.summary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let badges = &app.state.derived.badges;
    if badges.is_empty() {
        frame.render_widget(Paragraph::new("all caught up"), inner);
        return;
    }
    let lines: Vec<Line> = badges
        .iter()
        .map(|badge| {
            let color = match badge.class {
                BadgeClass::Warning => Color::Yellow,
                BadgeClass::Info => Color::Blue,
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", badge.area), Style::default().fg(color)),
                Span::raw(badge.message.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_recent_checkins(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Recent check-ins", &app.state.checkins));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(checkins) = app.state.checkins.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    let lines: Vec<Line> = checkins
        .iter()
        .rev()
        .take(usize::from(inner.height))
        .map(|c| {
            let flag = |on: bool, ch: char| if on { ch } else { '-' };
            Line::from(format!(
                "{}  {}{}{}  {}",
                c.day,
                flag(c.wakeup_5am, 'W'),
                flag(c.workout, 'G'),
                flag(c.video_captured, 'V'),
                c.notes
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
