//! Terminal renditions of the dashboard charts

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, List, ListItem, Paragraph},
    Frame,
};

use super::app::App;
use super::utils::TuiColors;
use crate::client::HttpTransport;
use crate::scale::LinearScale;
use crate::utils::{fmt_date, format_number, truncate_to_width};

const NAME_COLS: usize = 18;

fn panel<'a>(title: &'a str, colors: &TuiColors) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(colors.border())
        .style(colors.base())
}

fn placeholder(f: &mut Frame, block: Block, text: &str, colors: &TuiColors, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(colors.muted),
    )))
    .block(block);
    f.render_widget(paragraph, area);
}

/// Bounds that never collapse to a single value
fn padded_bounds(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo, lo + 1.0]
    }
}

/// Cumulative XP line; records where the plot landed for mouse hover
pub fn render_xp_over_time<T: HttpTransport>(
    f: &mut Frame,
    app: &mut App<T>,
    area: Rect,
    colors: &TuiColors,
) {
    let readout = app.readout();
    let title = match &readout {
        Some(r) => format!(" XP Over Time · {} ", r.label),
        None => " XP Over Time ".to_string(),
    };
    let block = panel(&title, colors);
    let inner = block.inner(area);
    app.chart_area = Some(inner);

    let points = &app.view.cumulative;
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        placeholder(f, block, "No XP yet", colors, area);
        return;
    };

    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.at.timestamp() as f64, p.total as f64))
        .collect();
    let max_total = points.iter().map(|p| p.total).max().unwrap_or(0);
    let x_bounds = padded_bounds(first.at.timestamp() as f64, last.at.timestamp() as f64);
    let y_bounds = padded_bounds(0.0, max_total as f64);

    let hovered: Vec<(f64, f64)> = readout
        .as_ref()
        .map(|r| vec![(r.at.timestamp() as f64, r.total as f64)])
        .unwrap_or_default();

    let mut datasets = vec![Dataset::default()
        .name("XP")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(colors.accent))
        .data(&data)];
    if !hovered.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(colors.pass).add_modifier(Modifier::BOLD))
                .data(&hovered),
        );
    }

    let label_style = Style::default().fg(colors.muted);
    let time_labels: Vec<Span> = app
        .chart
        .time_ticks(points)
        .iter()
        .step_by(2)
        .map(|t| Span::styled(fmt_date(t), label_style))
        .collect();
    let value_labels: Vec<Span> = app
        .chart
        .value_ticks(points)
        .iter()
        .map(|v| Span::styled(format_number(*v), label_style))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(label_style)
                .bounds(x_bounds)
                .labels(time_labels),
        )
        .y_axis(
            Axis::default()
                .style(label_style)
                .bounds(y_bounds)
                .labels(value_labels),
        );
    f.render_widget(chart, area);
}

/// Ranked rows as block-character bars
pub fn render_xp_by_project<T: HttpTransport>(
    f: &mut Frame,
    app: &App<T>,
    area: Rect,
    colors: &TuiColors,
) {
    let block = panel(" XP by Project ", colors);
    let rows = &app.view.ranked;
    if rows.is_empty() {
        placeholder(f, block, "No project XP yet", colors, area);
        return;
    }

    let inner = block.inner(area);
    // name, space, bar, space, value
    let bar_cols = (inner.width as usize).saturating_sub(NAME_COLS + 12).max(1);
    let max = rows.iter().map(|r| r.amount).max().unwrap_or(0).max(0);
    let scale = LinearScale::new((0.0, max as f64), (0.0, bar_cols as f64));

    let lines: Vec<Line> = rows
        .iter()
        .take(inner.height as usize)
        .map(|row| {
            let cols = scale.map(row.amount as f64).max(0.0).round() as usize;
            Line::from(vec![
                Span::styled(
                    format!(
                        "{:<width$} ",
                        truncate_to_width(&row.name, NAME_COLS),
                        width = NAME_COLS
                    ),
                    Style::default().fg(colors.text),
                ),
                Span::styled("█".repeat(cols), Style::default().fg(colors.pass)),
                Span::styled(
                    format!(" {}", format_number(row.amount)),
                    Style::default().fg(colors.muted),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Pass-rate gauge with a literal-count legend
pub fn render_pass_fail<T: HttpTransport>(
    f: &mut Frame,
    app: &App<T>,
    area: Rect,
    colors: &TuiColors,
) {
    let block = panel(" Pass / Fail ", colors);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let counts = app.view.pass_fail;
    // Nothing classified yet: an empty neutral bar rather than a red one
    let remainder = if counts.total() == 0 {
        colors.muted
    } else {
        colors.fail
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors.pass).bg(remainder))
        .ratio(counts.pass_rate().clamp(0.0, 1.0))
        .label(format!("{}% Pass rate", counts.percent()));
    f.render_widget(gauge, chunks[0]);

    let legend = Line::from(vec![
        Span::styled("■ ", Style::default().fg(colors.pass)),
        Span::styled(format!("Pass: {}  ", counts.pass), Style::default().fg(colors.text)),
        Span::styled("■ ", Style::default().fg(colors.fail)),
        Span::styled(format!("Fail: {}", counts.fail), Style::default().fg(colors.text)),
    ]);
    f.render_widget(Paragraph::new(legend), chunks[2]);
}

pub fn render_recent_results<T: HttpTransport>(
    f: &mut Frame,
    app: &App<T>,
    area: Rect,
    colors: &TuiColors,
) {
    let block = panel(" Recent Results ", colors);
    if app.view.recent.is_empty() {
        placeholder(f, block, "No results yet", colors, area);
        return;
    }

    let title_cols = (block.inner(area).width as usize).saturating_sub(14).max(4);
    let items: Vec<ListItem> = app
        .view
        .recent
        .iter()
        .map(|entry| {
            let (mark, color) = if entry.is_pass() {
                ("✓", colors.pass)
            } else {
                ("✗", colors.fail)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", mark), Style::default().fg(color)),
                Span::styled(
                    format!(
                        "{:<width$} ",
                        truncate_to_width(entry.title(), title_cols),
                        width = title_cols
                    ),
                    Style::default().fg(colors.text),
                ),
                Span::styled(
                    fmt_date(&entry.last_touched()),
                    Style::default().fg(colors.muted),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded_bounds(0.0, 10.0), [0.0, 10.0]);
        assert_eq!(padded_bounds(5.0, 5.0), [5.0, 6.0]);
    }
}
