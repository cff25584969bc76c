pub mod gallery;
pub mod results;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};
use vismem_core::search::ALL_SORT_KEYS;

use super::app::{App, InputMode};
use super::widgets::{filter_bar::FilterBar, help_bar::HelpBar, search_input::SearchInput};

/// Render the chrome shared by the gallery and results views and
/// return the area left for the table.
fn render_chrome(frame: &mut Frame, app: &App, area: Rect) -> Rect {
    let layout = Layout::vertical([
        Constraint::Length(3), // search bar
        Constraint::Length(1), // suggestions
        Constraint::Length(1), // filter bar
        Constraint::Min(5),    // table
        Constraint::Length(1), // help bar
    ])
    .split(area);

    let searching = app.input_mode == InputMode::Search;
    let text = if searching {
        &app.search_input
    } else {
        &app.snapshot.query
    };
    frame.render_widget(
        SearchInput {
            text,
            cursor: app.search_cursor,
            focused: searching,
        },
        layout[0],
    );

    render_suggestions(frame, app, layout[1]);

    let filtering = app.input_mode == InputMode::Filter;
    let (sort_by, min_confidence) = if filtering {
        (ALL_SORT_KEYS[app.sort_index], app.min_confidence)
    } else {
        (
            app.snapshot.filters.sort_by,
            app.snapshot.filters.min_confidence,
        )
    };
    frame.render_widget(
        FilterBar {
            sort_by,
            min_confidence,
            active: filtering,
        },
        layout[2],
    );

    frame.render_widget(
        HelpBar {
            input_mode: &app.input_mode,
            viewing_results: app.viewing_results(),
        },
        layout[4],
    );

    layout[3]
}

fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    if app.input_mode != InputMode::Search || app.suggestions.is_empty() {
        return;
    }

    let mut spans: Vec<Span> = vec![Span::styled(
        "Suggestions: ",
        Style::default().fg(Color::DarkGray),
    )];
    for (i, suggestion) in app.suggestions.iter().enumerate() {
        let style = if app.suggestion_selected == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {suggestion} "), style));
        if i < app.suggestions.len() - 1 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }
    }

    let line = Line::from(spans);
    frame
        .buffer_mut()
        .set_line(area.x, area.y, &line, area.width);
}
