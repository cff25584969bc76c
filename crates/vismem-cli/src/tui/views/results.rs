use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Cell, Row, Table, TableState},
    Frame,
};
use vismem_core::model::SearchResult;

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let table_area = super::render_chrome(frame, app, area);
    render_table(frame, app, table_area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Score"),
        Cell::from("Filename"),
        Cell::from("Uploaded"),
        Cell::from("Description"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = app.snapshot.results.iter().map(make_row).collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(24),
        Constraint::Length(17),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            ratatui::widgets::Block::default()
                .borders(ratatui::widgets::Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(
                    " Results for \"{}\" ({}) ",
                    app.snapshot.query,
                    app.snapshot.results.len()
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

fn make_row(result: &SearchResult) -> Row<'_> {
    let score_color = if result.confidence_score >= 0.7 {
        Color::Green
    } else if result.confidence_score >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    };
    let score_cell = Cell::from(Span::styled(
        format!("{:.2}", result.confidence_score),
        Style::default().fg(score_color),
    ));

    let filename_cell = Cell::from(Span::styled(
        result.filename().to_string(),
        Style::default().fg(Color::Cyan),
    ));

    let date_cell = Cell::from(Span::styled(
        result
            .screenshot
            .upload_time
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    let description_cell = Cell::from(result.visual_description.as_str());

    Row::new(vec![score_cell, filename_cell, date_cell, description_cell])
}
