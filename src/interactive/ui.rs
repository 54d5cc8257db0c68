//! Main UI rendering logic

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{SystemTime, UNIX_EPOCH};

use super::app::{App, AppMode};
use super::charts;
use super::login_form::LoginField;
use super::utils::{get_message_style, TuiColors};
use crate::client::HttpTransport;
use crate::session::Screen;
use crate::utils::{fmt_date, format_number};

pub fn draw<T: HttpTransport>(f: &mut Frame, app: &mut App<T>) {
    let size = f.size();
    let colors = TuiColors::for_theme(app.current_theme());
    f.render_widget(Block::default().style(colors.base()), size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(5), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0], &colors);
    match app.screen() {
        Screen::Login => render_login(f, app, chunks[1], &colors),
        Screen::Dashboard => render_dashboard(f, app, chunks[1], &colors),
    }
    render_messages(f, app, chunks[2], &colors);
    render_footer(f, app, chunks[3], &colors);

    if app.mode == AppMode::Help {
        render_help(f, size, &colors);
    }
}

fn spinner() -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    FRAMES[((millis / 100) % FRAMES.len() as u128) as usize]
}

fn render_header<T: HttpTransport>(f: &mut Frame, app: &App<T>, area: Rect, colors: &TuiColors) {
    let mut spans = vec![Span::styled(
        " xpboard ",
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(user) = &app.view.user {
        spans.push(Span::styled(
            format!("· Welcome, {} ({}) ", user.display_name(), user.login),
            Style::default().fg(colors.text),
        ));
    }
    if app.resources.is_loading() {
        spans.push(Span::styled(
            format!("{} Loading…", spinner()),
            Style::default().fg(colors.muted),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(colors.border()),
    );
    f.render_widget(header, area);
}

fn render_login<T: HttpTransport>(f: &mut Frame, app: &App<T>, area: Rect, colors: &TuiColors) {
    let width = area.width.min(60);
    let height = area.height.min(10);
    let form_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in ")
        .border_style(colors.border());
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    for (field, row) in [LoginField::Identity, LoginField::Password]
        .into_iter()
        .zip(rows.iter())
    {
        let focused = app.login.focus == field;
        let border = if focused {
            colors.border().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted)
        };
        let input = Paragraph::new(app.login.display_value(field))
            .style(Style::default().fg(colors.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.label())
                    .border_style(border),
            );
        f.render_widget(input, *row);

        if focused {
            let cursor = app.login.input(field).visual_cursor() as u16;
            let max_x = row.x + row.width.saturating_sub(2);
            f.set_cursor((row.x + 1 + cursor).min(max_x), row.y + 1);
        }
    }

    let hint = if app.login.submitting {
        format!("{} Signing in…", spinner())
    } else {
        "Tab switch field · Enter sign in · Esc quit".to_string()
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(colors.muted)))
            .alignment(Alignment::Center),
        rows[2],
    );
}

fn render_dashboard<T: HttpTransport>(
    f: &mut Frame,
    app: &mut App<T>,
    area: Rect,
    colors: &TuiColors,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);
    render_tiles(f, app, rows[0], colors);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(columns[1]);

    charts::render_xp_over_time(f, app, left[0], colors);
    charts::render_xp_by_project(f, app, left[1], colors);
    charts::render_pass_fail(f, app, right[0], colors);
    charts::render_recent_results(f, app, right[1], colors);
}

fn render_tiles<T: HttpTransport>(f: &mut Frame, app: &App<T>, area: Rect, colors: &TuiColors) {
    let tiles = &app.view.tiles;
    let values = [
        ("Total XP", format_number(tiles.total_xp)),
        ("Projects", tiles.project_count.to_string()),
        ("Transactions", tiles.transaction_count.to_string()),
        ("Pass rate", format!("{}%", tiles.pass_rate_percent)),
        (
            "Last activity",
            tiles
                .last_activity
                .as_ref()
                .map(fmt_date)
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, values.len() as u32); 5])
        .split(area);

    for ((label, value), cell) in values.into_iter().zip(cells.iter()) {
        let tile = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(label)
                .border_style(Style::default().fg(colors.muted)),
        );
        f.render_widget(tile, *cell);
    }
}

fn render_messages<T: HttpTransport>(f: &mut Frame, app: &App<T>, area: Rect, colors: &TuiColors) {
    let mut lines: Vec<Line> = app
        .messages
        .recent(3)
        .iter()
        .map(|msg| {
            let style = get_message_style(msg.message_type);
            Line::from(vec![
                Span::styled(format!("{} ", msg.icon()), style),
                Span::styled(msg.text.clone(), style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(colors.muted),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(colors.border()),
    );
    f.render_widget(paragraph, area);
}

fn render_footer<T: HttpTransport>(f: &mut Frame, app: &App<T>, area: Rect, colors: &TuiColors) {
    let shortcuts = match (app.mode, app.screen()) {
        (AppMode::Help, _) => "Esc/?: Close help",
        (_, Screen::Login) => "Tab: Switch field | Enter: Sign in | Esc: Quit",
        (_, Screen::Dashboard) => {
            "q: Quit | r: Refresh | t: Theme | l: Logout | e: Export SVG | ←/→: Hover | ?: Help"
        }
    };
    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(colors.muted))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.border()),
        );
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame, area: Rect, colors: &TuiColors) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), bold.fg(colors.accent)),
            Span::styled(what, Style::default().fg(colors.text)),
        ])
    };
    let help_text = vec![
        Line::from(Span::styled("Keyboard Shortcuts", bold.fg(colors.accent))),
        Line::from(""),
        entry("q", "Quit"),
        entry("r", "Refresh all data"),
        entry("t", "Toggle light/dark theme"),
        entry("l", "Log out"),
        entry("e", "Export charts as SVG"),
        entry("← / →", "Move the XP readout between points"),
        entry("Esc", "Clear the readout"),
        entry("mouse", "Hover the XP chart"),
        entry("?", "Toggle this help"),
    ];

    let width = area.width.min(56);
    let height = area.height.min(help_text.len() as u16 + 2);
    let popup = Rect {
        x: (area.width.saturating_sub(width)) / 2,
        y: (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(colors.border())
                .style(colors.base()),
        ),
        popup,
    );
}
