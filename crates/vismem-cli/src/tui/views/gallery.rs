use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
    Frame,
};
use vismem_core::model::Screenshot;
use vismem_core::preview::PreviewSource;

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let table_area = super::render_chrome(frame, app, area);
    render_table(frame, app, table_area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    if app.busy && app.snapshot.screenshots.is_empty() {
        let loading = Line::from(vec![Span::styled(
            "  Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(loading, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Filename"),
        Cell::from("Uploaded"),
        Cell::from("Preview"),
        Cell::from("Text"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = if app.snapshot.screenshots.is_empty() {
        vec![Row::new(vec![Cell::from(Span::styled(
            "  No screenshots. Press / to search or r to refresh.",
            Style::default().fg(Color::DarkGray),
        ))])]
    } else {
        app.snapshot
            .screenshots
            .iter()
            .map(|shot| make_row(app, shot))
            .collect()
    };

    let widths = [
        Constraint::Min(24),
        Constraint::Length(17),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(
                    " Screenshots ({}) ",
                    app.snapshot.screenshots.len()
                )),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn make_row<'a>(app: &App, shot: &'a Screenshot) -> Row<'a> {
    let filename_cell = Cell::from(Span::styled(
        shot.filename.clone(),
        Style::default().fg(Color::Cyan),
    ));

    let date_cell = Cell::from(Span::styled(
        shot.upload_time.format("%Y-%m-%d %H:%M").to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    let (preview_text, preview_color) = match app.snapshot.preview_sources.get(&shot.filename) {
        Some(PreviewSource::Remote) => ("image", Color::Green),
        Some(PreviewSource::Local) => ("local", Color::Cyan),
        Some(PreviewSource::Placeholder) => ("placeholder", Color::Yellow),
        None => ("-", Color::DarkGray),
    };
    let preview_cell = Cell::from(Span::styled(
        preview_text,
        Style::default().fg(preview_color),
    ));

    let text = shot.text_content.as_deref().unwrap_or("-");
    let mut snippet: String = text.chars().take(60).collect();
    if text.chars().count() > 60 {
        snippet.push('…');
    }
    let text_cell = Cell::from(snippet.replace('\n', " "));

    Row::new(vec![filename_cell, date_cell, preview_cell, text_cell])
}
