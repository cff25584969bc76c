use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::InputMode;

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar<'a> {
    pub input_mode: &'a InputMode,
    pub viewing_results: bool,
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let spans: Vec<Span> = match self.input_mode {
            InputMode::Normal => {
                let mut spans = vec![
                    Span::styled("j/k", key_style),
                    Span::styled(" navigate  ", style),
                    Span::styled("/", key_style),
                    Span::styled(" search  ", style),
                    Span::styled("f", key_style),
                    Span::styled(" filter  ", style),
                    Span::styled("d", key_style),
                    Span::styled(" delete  ", style),
                    Span::styled("m", key_style),
                    Span::styled(" migrate  ", style),
                    Span::styled("r", key_style),
                    Span::styled(" refresh  ", style),
                ];
                if self.viewing_results {
                    spans.push(Span::styled("Esc", key_style));
                    spans.push(Span::styled(" back to gallery  ", style));
                }
                spans.push(Span::styled("q", key_style));
                spans.push(Span::styled(" quit", style));
                spans
            }
            InputMode::Search => vec![
                Span::styled("Enter", key_style),
                Span::styled(" search  ", style),
                Span::styled("Tab", key_style),
                Span::styled(" suggestion  ", style),
                Span::styled("Esc", key_style),
                Span::styled(" cancel", style),
            ],
            InputMode::Filter => vec![
                Span::styled("←/→", key_style),
                Span::styled(" sort order  ", style),
                Span::styled("+/-", key_style),
                Span::styled(" min score  ", style),
                Span::styled("Enter/Esc", key_style),
                Span::styled(" apply", style),
            ],
            InputMode::ConfirmDelete => vec![
                Span::styled("y", key_style),
                Span::styled(" confirm  ", style),
                Span::styled("n", key_style),
                Span::styled(" cancel", style),
            ],
        };

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
