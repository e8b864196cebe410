use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use crate::app::App;
use crate::render::{draw_form, group_title};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(columns[0]);

    draw_chart(frame, left[0], app);
    draw_photos(frame, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    draw_form(
        frame,
        right[0],
        &app.fitness_forms,
        0,
        app.state.fitness.is_loading(),
    );
    draw_form(frame, right[1], &app.fitness_forms, 1, false);
    draw_latest(frame, right[2], app);
}

/// Weight and waist as two lines over the merged series. Days missing one
/// measurement simply contribute no point to that dataset: a gap, not a
/// zero.
fn draw_chart(frame: &mut Frame, area: Rect, app: &App) {
    let series = &app.state.derived.fitness_series;

    let weight: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.weight.map(|w| (i as f64, w)))
        .collect();
    let waist: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.waist.map(|w| (i as f64, w)))
        .collect();

    let title = group_title("Weight / waist", &app.state.fitness);
    if weight.is_empty() && waist.is_empty() {
        frame.render_widget(
            Paragraph::new("no measurements in range")
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
        return;
    }

    let values = weight.iter().chain(waist.iter()).map(|(_, y)| *y);
    let y_min = values.clone().fold(f64::INFINITY, f64::min);
    let y_max = values.fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.1).max(1.0);

    let x_max = (series.len().saturating_sub(1)).max(1) as f64;
    let x_labels: Vec<Line> = match series.as_slice() {
        [] => vec![],
        [only] => vec![Line::from(only.day.clone())],
        [first, .., last] => vec![Line::from(first.day.clone()), Line::from(last.day.clone())],
    };

    let datasets = vec![
        Dataset::default()
            .name("weight (lbs)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&weight),
        Dataset::default()
            .name("waist (in)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&waist),
    ];
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(
            Axis::default()
                .bounds([y_min - pad, y_max + pad])
                .labels(vec![
                    Line::from(format!("{:.0}", y_min - pad)),
                    Line::from(format!("{:.0}", y_max + pad)),
                ]),
        );
    frame.render_widget(chart, area);
}

fn draw_photos(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(group_title("Progress photos", &app.state.fitness));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(data) = app.state.fitness.data() else {
        frame.render_widget(Paragraph::new("no data yet"), inner);
        return;
    };
    if data.photos.is_empty() {
        frame.render_widget(Paragraph::new("none in range"), inner);
        return;
    }
    let lines: Vec<Line> = data
        .photos
        .iter()
        .rev()
        .take(usize::from(inner.height))
        .map(|p| Line::from(format!("{}  {}", p.day, app.photo_url(&p.url))))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_latest(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Latest");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fmt = |v: Option<f64>, unit: &str| match v {
        Some(v) => format!("{v:.1} {unit}"),
        None => "-".to_string(),
    };
    let latest = app.state.fitness.data().map(|d| d.latest.clone()).unwrap_or_default();
    let lines = vec![
        Line::from(format!("weight: {}", fmt(latest.weight_lbs, "lbs"))),
        Line::from(format!("waist:  {}", fmt(latest.body_fat_pct, "in"))),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
