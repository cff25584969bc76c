use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use vismem_core::search::{SortKey, ALL_SORT_KEYS};

/// Filter bar showing the sort order and minimum confidence, with
/// cycling highlight while the filter mode is active.
pub struct FilterBar {
    pub sort_by: SortKey,
    pub min_confidence: f32,
    pub active: bool,
}

impl Widget for FilterBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans: Vec<Span> = Vec::new();
        let prefix = if self.active { "Filter: " } else { "Sort: " };
        spans.push(Span::styled(prefix, Style::default().fg(Color::DarkGray)));

        for (i, key) in ALL_SORT_KEYS.iter().enumerate() {
            let label = match key {
                SortKey::Relevance => "Rel",
                SortKey::Date => "Date",
                SortKey::Filename => "Name",
                SortKey::Confidence => "Conf",
            };

            let style = if *key == self.sort_by {
                if self.active {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                }
            } else {
                Style::default().fg(Color::DarkGray)
            };

            spans.push(Span::styled(format!(" {label} "), style));

            if i < ALL_SORT_KEYS.len() - 1 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
        }

        spans.push(Span::styled(
            "   min score: ",
            Style::default().fg(Color::DarkGray),
        ));
        let score_style = if self.min_confidence > 0.0 {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("{:.1}", self.min_confidence),
            score_style,
        ));

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
