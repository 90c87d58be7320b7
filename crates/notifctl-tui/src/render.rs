//! Pure view functions. Read `&AppState`, draw to a ratatui `Frame`.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::common::text::{single_line, truncate_with_ellipsis};
use crate::state::{AppState, InputMode, StatusKind};

const HEADER_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 2;

/// Spinner frames for the loading indicator.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const NAME_WIDTH: u16 = 32;
const APP_WIDTH: u16 = 20;

pub fn render(app: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_table(app, frame, chunks[1]);
    render_footer(app, frame, chunks[2]);
}

fn render_header(app: &AppState, frame: &mut Frame, area: Rect) {
    let bundle = app
        .active_bundle()
        .map_or("(no bundle)", |b| b.display_name.as_str());
    let application = app
        .active_application()
        .map_or("all applications", |a| a.display_name.as_str());

    let mut title = vec![
        Span::styled(
            bundle.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(application.to_string(), Style::default().fg(Color::DarkGray)),
    ];
    if let Some(name) = &app.name_filter {
        title.push(Span::styled(
            format!("  name~\"{name}\""),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut summary = vec![Span::raw(format!(
        "selected {} / total {}",
        app.selection.selected_count(),
        app.selection.total_count()
    ))];
    if let Some((index, last)) = app.page_position() {
        summary.push(Span::raw(format!("   page {index} / {last}")));
    }
    if app.selection.is_walking() || app.is_loading() {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        let label = if app.selection.is_walking() {
            "selecting all"
        } else {
            "loading"
        };
        summary.push(Span::styled(
            format!("   {spinner} {label}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(
        Paragraph::new(vec![Line::from(title), Line::from(summary)]),
        area,
    );
}

fn render_table(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    let rows = app.rows();

    if rows.is_empty() {
        let text = if app.is_loading() {
            "Loading…"
        } else {
            "No event types match the current filters"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block),
            area,
        );
        return;
    }

    let description_width =
        usize::from(area.width.saturating_sub(4 + NAME_WIDTH + APP_WIDTH + 4));

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let check = if row.is_selected { "[x]" } else { "[ ]" };
            let description = row
                .event
                .description
                .as_deref()
                .map(|d| truncate_with_ellipsis(&single_line(d), description_width))
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(check),
                Cell::from(truncate_with_ellipsis(
                    &row.event.display_name,
                    usize::from(NAME_WIDTH),
                )),
                Cell::from(truncate_with_ellipsis(
                    &row.event.application_display_name,
                    usize::from(APP_WIDTH),
                )),
                Cell::from(Span::styled(description, Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let header = Row::new(vec!["", "Event type", "Application", "Description"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(3),
            Constraint::Length(NAME_WIDTH),
            Constraint::Length(APP_WIDTH),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::Magenta)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    table_state.select(Some(app.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_footer(app: &AppState, frame: &mut Frame, area: Rect) {
    let first = match &app.input {
        InputMode::NameFilter(draft) => Line::from(vec![
            Span::styled("Name filter: ", Style::default().fg(Color::Cyan)),
            Span::raw(draft.clone()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]),
        InputMode::Table => match &app.status {
            Some(status) => {
                let color = match status.kind {
                    StatusKind::Info => Color::Green,
                    StatusKind::Error => Color::Red,
                };
                Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
            }
            None => Line::default(),
        },
    };

    let hints: &[(&str, &str)] = match app.input {
        InputMode::NameFilter(_) => &[("Enter", "apply"), ("Esc", "cancel")],
        InputMode::Table => &[
            ("↑↓", "move"),
            ("Space", "toggle"),
            ("a", "all"),
            ("p", "page"),
            ("n", "none"),
            ("←→", "pages"),
            ("/", "name"),
            ("Tab", "app"),
            ("b", "bundle"),
            ("Enter", "accept"),
            ("q", "quit"),
        ],
    };
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(
            (*key).to_string(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(vec![first, Line::from(spans)]), area);
}
