use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::app::App;
use crate::render::{draw_form, group_title};
use tracker_backend_client::MortgageEventKind;
use tracker_core::derived::percent_label;

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    draw_progress(frame, rows[0], app);
    draw_numbers(frame, rows[1], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    draw_events(frame, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(5), Constraint::Min(0)])
        .split(columns[1]);
    draw_form(
        frame,
        right[0],
        &app.mortgage_forms,
        0,
        app.state.mortgage_events.is_loading(),
    );
    draw_form(frame, right[1], &app.mortgage_forms, 1, false);
}

fn draw_progress(frame: &mut Frame, area: Rect, app: &App) {
    let ratio = app.state.derived.mortgage_ratio;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(group_title("Paydown progress (YTD)", &app.state.mortgage_summary)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(percent_label(ratio));
    frame.render_widget(gauge, area);
}

fn draw_numbers(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(summary) = app.state.mortgage_summary.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    let balance = summary
        .latest_principal_balance
        .map(|b| format!("${b:.0}"))
        .unwrap_or_else(|| "-".to_string());
    let lines = vec![
        Line::from(format!(
            "start ${:.0}  target ${:.0}  latest balance {balance}",
            summary.mortgage_start_principal, summary.mortgage_target_principal
        )),
        Line::from(format!(
            "extra principal: ${:.0} YTD  ${:.0} this month",
            summary.principal_paid_extra_ytd, summary.principal_paid_extra_month
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Events", &app.state.mortgage_events));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(events) = app.state.mortgage_events.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    if events.is_empty() {
        frame.render_widget(Paragraph::new("none in range"), inner);
        return;
    }
    // Newest first for display; the backend returns ascending by day.
    let lines: Vec<Line> = events
        .iter()
        .rev()
        .take(usize::from(inner.height))
        .map(|e| {
            let kind = match e.kind {
                MortgageEventKind::PrincipalPayment => "payment",
                MortgageEventKind::BalanceCheck => "balance",
            };
            Line::from(format!("{}  {kind:>7}  ${:.0}  {}", e.day, e.amount, e.note))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
